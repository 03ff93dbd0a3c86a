// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

#[cfg(test)]
mod tests {
    use crate::domain::services::frontier::FrontierManager;
    use url::Url;

    fn seed() -> Url {
        Url::parse("https://example.com/").unwrap()
    }

    #[test]
    fn test_seed_is_first_entry_at_depth_zero() {
        let mut frontier = FrontierManager::new(&seed(), 10, 3, false);
        let entry = frontier.next_entry().unwrap();
        assert_eq!(entry.url, "https://example.com/");
        assert_eq!(entry.depth, 0);
        assert!(entry.discovered_from.is_none());
    }

    #[test]
    fn test_dequeue_marks_visited_atomically() {
        let mut frontier = FrontierManager::new(&seed(), 10, 3, false);
        let entry = frontier.next_entry().unwrap();
        assert!(frontier.is_visited(&entry.url));

        // Rediscovery of an in-flight URL must be a no-op
        assert!(!frontier.enqueue("https://example.com/", 1, Some("https://example.com/")));
    }

    #[test]
    fn test_no_url_visited_twice_multi_origin() {
        let mut frontier = FrontierManager::new(&seed(), 10, 3, false);
        frontier.next_entry().unwrap();

        assert!(frontier.enqueue("https://example.com/a", 1, Some("https://example.com/")));
        // Same URL discovered from another page
        assert!(!frontier.enqueue("https://example.com/a", 1, Some("https://example.com/b")));
        // Same URL with a fragment normalizes to the same key
        assert!(!frontier.enqueue("https://example.com/a#section", 1, None));

        let mut seen = Vec::new();
        while let Some(entry) = frontier.next_entry() {
            seen.push(entry.url);
        }
        assert_eq!(seen, vec!["https://example.com/a"]);
    }

    #[test]
    fn test_depth_budget_rejects_over_limit() {
        let mut frontier = FrontierManager::new(&seed(), 10, 1, false);
        frontier.next_entry().unwrap();

        assert!(frontier.enqueue("https://example.com/b", 1, None));
        assert!(!frontier.enqueue("https://example.com/d", 2, None));
    }

    #[test]
    fn test_max_depth_is_link_cutoff_not_fetch_cutoff() {
        // Scenario: A links to B and C (depth 1); B links to D (depth 2);
        // max_depth = 1 means B and C are fetched but D is never enqueued.
        let mut frontier = FrontierManager::new(&seed(), 10, 1, false);
        let a = frontier.next_entry().unwrap();
        assert_eq!(a.depth, 0);

        assert!(frontier.enqueue("https://example.com/b", a.depth + 1, Some(&a.url)));
        assert!(frontier.enqueue("https://example.com/c", a.depth + 1, Some(&a.url)));

        let b = frontier.next_entry().unwrap();
        assert_eq!(b.depth, 1);
        // B's children are one past the budget
        assert!(!frontier.enqueue("https://example.com/d", b.depth + 1, Some(&b.url)));

        let c = frontier.next_entry().unwrap();
        assert_eq!(c.url, "https://example.com/c");
        assert!(frontier.next_entry().is_none());
        assert_eq!(frontier.visited_count(), 3);
    }

    #[test]
    fn test_page_budget_stops_dequeue() {
        let mut frontier = FrontierManager::new(&seed(), 1, 3, false);
        frontier.next_entry().unwrap();
        frontier.enqueue("https://example.com/b", 1, None);

        // max_pages = 1: exactly one page is ever attempted
        assert!(frontier.next_entry().is_none());
        assert_eq!(frontier.visited_count(), 1);
    }

    #[test]
    fn test_fifo_breadth_first_order() {
        let mut frontier = FrontierManager::new(&seed(), 10, 3, false);
        frontier.next_entry().unwrap();
        frontier.enqueue("https://example.com/1", 1, None);
        frontier.enqueue("https://example.com/2", 1, None);
        frontier.enqueue("https://example.com/3", 1, None);

        assert_eq!(frontier.next_entry().unwrap().url, "https://example.com/1");
        assert_eq!(frontier.next_entry().unwrap().url, "https://example.com/2");
        assert_eq!(frontier.next_entry().unwrap().url, "https://example.com/3");
    }

    #[test]
    fn test_same_domain_scope_filters_silently() {
        let mut frontier = FrontierManager::new(&seed(), 10, 3, true);
        frontier.next_entry().unwrap();

        assert!(frontier.enqueue("https://www.example.com/sub", 1, None));
        assert!(!frontier.enqueue("https://elsewhere.org/page", 1, None));
    }

    #[test]
    fn test_unparseable_link_discarded() {
        let mut frontier = FrontierManager::new(&seed(), 10, 3, false);
        assert!(!frontier.enqueue("not a url at all", 1, None));
    }

    #[test]
    fn test_exhaustion_reporting() {
        let mut frontier = FrontierManager::new(&seed(), 2, 3, false);
        assert!(!frontier.is_exhausted());
        frontier.next_entry().unwrap();
        assert!(frontier.is_exhausted()); // queue drained

        frontier.enqueue("https://example.com/a", 1, None);
        assert!(!frontier.is_exhausted());
        frontier.next_entry().unwrap();
        assert!(frontier.is_exhausted()); // budget reached
    }
}
