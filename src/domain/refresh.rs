//! Refresh eligibility: which categories are stale enough to scrape again.

use chrono::{NaiveDateTime, TimeDelta};

use crate::domain::category::Category;

/// Default staleness window.
pub const DEFAULT_STALENESS_HOURS: u32 = 24;

/// Window for `hours` hours.
pub fn staleness_window(hours: u32) -> TimeDelta {
    TimeDelta::hours(i64::from(hours))
}

/// Whether `category` is due for a refresh at `now`.
///
/// Never-scraped categories are always due. A category scraped exactly at
/// the cutoff is still fresh.
pub fn is_due(category: &Category, window: TimeDelta, now: NaiveDateTime) -> bool {
    match category.last_scraped {
        None => true,
        Some(scraped_at) => now
            .checked_sub_signed(window)
            .is_some_and(|cutoff| scraped_at < cutoff),
    }
}

/// Select the categories due for a refresh, oldest first.
///
/// Categories that were never scraped sort before every timestamp. The sort
/// is stable, so ties keep the order they were supplied in.
pub fn due_categories(
    categories: Vec<Category>,
    window: TimeDelta,
    now: NaiveDateTime,
) -> Vec<Category> {
    let mut due: Vec<Category> = categories
        .into_iter()
        .filter(|category| is_due(category, window, now))
        .collect();
    // `None < Some(_)` for `Option`, which puts never-scraped entries first.
    due.sort_by_key(|category| category.last_scraped);
    due
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{CategoryHref, CategoryId, CategoryName};
    use chrono::DateTime;

    fn now() -> NaiveDateTime {
        DateTime::from_timestamp(1_750_000_000, 0).unwrap().naive_utc()
    }

    fn category(id: i32, last_scraped: Option<NaiveDateTime>) -> Category {
        Category {
            id: CategoryId::new(id).unwrap(),
            name: CategoryName::new(format!("Category {id}")).unwrap(),
            href: CategoryHref::new(format!("/zgbs/category-{id}")).unwrap(),
            last_scraped,
            created_at: DateTime::from_timestamp(0, 0).unwrap().naive_utc(),
        }
    }

    #[test]
    fn never_scraped_first_and_fresh_excluded() {
        let now = now();
        let categories = vec![
            category(1, None),
            category(2, Some(now - TimeDelta::hours(1))),
            category(3, Some(now - TimeDelta::hours(48))),
        ];

        let due = due_categories(categories, staleness_window(24), now);

        let ids: Vec<i32> = due.iter().map(|c| c.id.get()).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn orders_oldest_first() {
        let now = now();
        let categories = vec![
            category(1, Some(now - TimeDelta::hours(30))),
            category(2, Some(now - TimeDelta::hours(90))),
            category(3, None),
            category(4, Some(now - TimeDelta::hours(60))),
        ];

        let due = due_categories(categories, staleness_window(24), now);

        let ids: Vec<i32> = due.iter().map(|c| c.id.get()).collect();
        assert_eq!(ids, vec![3, 2, 4, 1]);
    }

    #[test]
    fn cutoff_boundary_is_fresh() {
        let now = now();
        let at_cutoff = category(1, Some(now - TimeDelta::hours(24)));
        let just_past = category(2, Some(now - TimeDelta::hours(24) - TimeDelta::seconds(1)));

        assert!(!is_due(&at_cutoff, staleness_window(24), now));
        assert!(is_due(&just_past, staleness_window(24), now));
    }

    #[test]
    fn zero_window_makes_every_scraped_category_due() {
        let now = now();
        let categories = vec![category(1, Some(now - TimeDelta::seconds(1)))];

        assert_eq!(due_categories(categories, staleness_window(0), now).len(), 1);
    }
}
