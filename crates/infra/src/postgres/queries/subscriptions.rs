use diesel::{pg::Pg, prelude::*};

use domain::{
    schema::subscriptions,
    value_objects::subscriptions::{ListSubscriptionsFilter, SubscriptionSummaryFilter},
};

pub type BoxedSubscriptionQuery = subscriptions::BoxedQuery<'static, Pg>;

/// Wraps `term` in `%` for a substring match, escaping LIKE metacharacters so they match
/// literally.
pub fn contains_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

/// Every optional filter is pushed together with its bind value, so placeholders stay
/// numbered consecutively whichever filters are present.
pub fn list_subscriptions_query(filter: &ListSubscriptionsFilter) -> BoxedSubscriptionQuery {
    let mut query = subscriptions::table.into_boxed();

    if let Some(user_id) = filter.user_id {
        query = query.filter(subscriptions::user_id.eq(user_id));
    }

    if let Some(service_name) = filter.service_name.as_deref() {
        query = query.filter(subscriptions::service_name.ilike(contains_pattern(service_name)));
    }

    query
        .order(subscriptions::id.asc())
        .limit(filter.limit)
        .offset(filter.offset)
}

/// Rows counted by the period summary. Callers select the aggregate on top of it.
pub fn summary_scope_query(filter: &SubscriptionSummaryFilter) -> BoxedSubscriptionQuery {
    let mut query = subscriptions::table
        .filter(subscriptions::user_id.eq(filter.user_id))
        .filter(subscriptions::start_date.ge(filter.from.first_day()))
        .filter(
            subscriptions::end_date
                .is_null()
                .or(subscriptions::end_date.le(filter.to.first_day())),
        )
        .into_boxed();

    if let Some(service_name) = filter.service_name.as_deref() {
        query = query.filter(subscriptions::service_name.ilike(contains_pattern(service_name)));
    }

    query
}
