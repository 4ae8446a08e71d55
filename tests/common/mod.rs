//! Fixtures shared by the integration tests

#![allow(dead_code)]

/// Graph vertex used as the queue payload
///
/// A vertex never compares equal to a key, so the binomial queue's
/// existing-entry check never rejects it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Vertex(pub usize);

impl PartialEq<i32> for Vertex {
    fn eq(&self, _: &i32) -> bool {
        false
    }
}

impl PartialEq<i64> for Vertex {
    fn eq(&self, _: &i64) -> bool {
        false
    }
}

impl PartialEq<u64> for Vertex {
    fn eq(&self, _: &u64) -> bool {
        false
    }
}

impl PartialEq<String> for Vertex {
    fn eq(&self, _: &String) -> bool {
        false
    }
}

/// Named payload for the hand-written scenarios
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Label(pub &'static str);

impl PartialEq<i32> for Label {
    fn eq(&self, _: &i32) -> bool {
        false
    }
}

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Extracts every entry in order
pub fn drain<K, V, Q>(queue: &mut Q) -> Vec<(K, V)>
where
    K: Ord,
    V: Eq,
    Q: mergeable_heaps::MergeableQueue<K, V>,
{
    let mut out = Vec::with_capacity(queue.len());
    while let Some(entry) = queue.remove_min() {
        out.push(entry);
    }
    out
}
