use super::types::{Node, NodeId};

/// Lower-cased query, or `None` when there is nothing to search for.
pub fn normalize_query(raw: &str) -> Option<String> {
	if raw.is_empty() {
		None
	} else {
		Some(raw.to_lowercase())
	}
}

/// Case-insensitive substring match against label or title.
/// `query` must already be lower-cased.
pub fn matches(node: &Node, query: &str) -> bool {
	node.label.to_lowercase().contains(query) || node.title.to_lowercase().contains(query)
}

/// Index of the first node in iteration order that matches.
pub fn first_match(nodes: &[Node], query: &str) -> Option<usize> {
	nodes.iter().position(|n| matches(n, query))
}

/// Identifies one highlight so its reset can tell whether it is still current.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HighlightToken(u64);

/// Tracks which node carries the search highlight.
///
/// Each new highlight bumps the generation, so a reset scheduled by an
/// earlier search is recognised as stale and ignored.
#[derive(Debug, Default)]
pub struct HighlightTracker {
	generation: u64,
	current: Option<(HighlightToken, NodeId)>,
}

impl HighlightTracker {
	/// Start a highlight. Returns the node of the highlight it replaces, if any.
	pub fn begin(&mut self, node: NodeId) -> (HighlightToken, Option<NodeId>) {
		self.generation += 1;
		let token = HighlightToken(self.generation);
		let previous = self.current.replace((token, node)).map(|(_, id)| id);
		(token, previous)
	}

	/// End the highlight identified by `token`, if it is still the current one.
	pub fn finish(&mut self, token: HighlightToken) -> Option<NodeId> {
		match &self.current {
			Some((current, _)) if *current == token => self.current.take().map(|(_, id)| id),
			_ => None,
		}
	}

	pub fn current(&self) -> Option<&NodeId> {
		self.current.as_ref().map(|(_, id)| id)
	}
}

/// The one outstanding highlight reset.
///
/// Scheduling a new reset hands the previous one to `cancel`, so at most one
/// timer is ever pending.
#[derive(Debug)]
pub struct ResetSlot<T> {
	pending: Option<T>,
}

impl<T> Default for ResetSlot<T> {
	fn default() -> Self {
		Self { pending: None }
	}
}

impl<T> ResetSlot<T> {
	pub fn schedule(&mut self, next: T, cancel: impl FnOnce(T)) {
		if let Some(prev) = self.pending.replace(next) {
			cancel(prev);
		}
	}
}
