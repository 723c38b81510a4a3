//! "Next articles" suggestions shown at the bottom of an article page.
//!
//! Each article suggests up to two articles from the same locale list. The
//! rules, applied in this order:
//!
//! 1. Take the (up to) two articles right after it.
//! 2. Nothing after it: wrap around to the first two of the list.
//! 3. Exactly one suggestion and the list is not of length 2: append the
//!    first article of the list.
//! 4. A list of one article suggests nothing.
//!
//! Rule 3 can pad with an article that is already the current one's
//! neighbour; that is accepted, no deduplication happens.

/// Select the "next" suggestions for `articles[index]`.
pub fn select_next<T>(articles: &[T], index: usize) -> Vec<&T> {
    let len = articles.len();
    let start = (index + 1).min(len);
    let end = (index + 3).min(len);
    let mut next: Vec<&T> = articles[start..end].iter().collect();

    if next.is_empty() {
        next = articles.iter().take(2).collect();
    }
    if next.len() == 1 && len != 2 {
        next.extend(articles.first());
    }
    if len == 1 {
        next.clear();
    }
    next
}
