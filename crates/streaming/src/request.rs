use std::collections::BTreeMap;

/// Identifies a fetch in a deterministic, stable way.
///
/// Small and copyable so it can travel with an async completion and be
/// compared against the tracker when the result comes back.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Request(pub u64);

/// Latest-wins bookkeeping for fetches keyed by dataset id.
///
/// Each `begin` supersedes whatever was in flight for the same key; a
/// completion is only worth applying while its token is still current.
#[derive(Debug, Default)]
pub struct RequestTracker {
    next: u64,
    current: BTreeMap<String, Request>,
}

impl RequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&mut self, key: impl Into<String>) -> Request {
        let req = Request(self.next);
        self.next += 1;
        self.current.insert(key.into(), req);
        req
    }

    pub fn is_current(&self, key: &str, req: Request) -> bool {
        self.current.get(key) == Some(&req)
    }

    /// Retires `req` if it is still current. Returns whether the caller should
    /// apply the result.
    pub fn finish(&mut self, key: &str, req: Request) -> bool {
        if self.is_current(key, req) {
            self.current.remove(key);
            true
        } else {
            false
        }
    }

    /// Forgets any in-flight request for `key` so a late completion is dropped.
    pub fn cancel(&mut self, key: &str) -> Option<Request> {
        self.current.remove(key)
    }

    pub fn in_flight(&self) -> usize {
        self.current.len()
    }
}
