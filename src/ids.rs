// ABOUTME: Fold identifier construction for rendered decks
// ABOUTME: Threads a growable segment path through traversal so identifiers stay document-unique

/// Leading segment of every fold identifier; the client script binds to it.
pub const ID_PREFIX: &str = "collapsible";

/// Path from the document root to the current traversal position.
///
/// Enclosing folds contribute a `depth-owner-fold` triple and structured
/// containers contribute a tagged segment (`n1i3` for item 3 of node 1,
/// `row0`, `col1`), so two distinct positions never produce the same segment
/// sequence. Segments never contain `-`, which keeps the joined form
/// unambiguous.
#[derive(Debug, Clone)]
pub struct IdPath {
    segments: Vec<String>,
}

impl Default for IdPath {
    fn default() -> Self {
        Self::new()
    }
}

impl IdPath {
    pub fn new() -> Self {
        Self::with_prefix(ID_PREFIX)
    }

    pub fn with_prefix(prefix: &str) -> Self {
        Self {
            segments: vec![prefix.replace('-', "_")],
        }
    }

    /// Identifier for fold `fold` of the node at `owner`, rendered at `depth`.
    pub fn fold_id(&self, depth: usize, owner: usize, fold: usize) -> String {
        let mut id = self.segments.join("-");
        id.push_str(&format!("-{}-{}-{}", depth, owner, fold));
        id
    }

    /// Descend into a fold's panel. Returns a mark for [`IdPath::reset`].
    pub fn enter_fold(&mut self, depth: usize, owner: usize, fold: usize) -> usize {
        let mark = self.segments.len();
        self.segments.push(depth.to_string());
        self.segments.push(owner.to_string());
        self.segments.push(fold.to_string());
        mark
    }

    /// Descend into structured content item `index` of the node at `owner`.
    pub fn enter_item(&mut self, owner: usize, index: usize) -> usize {
        self.enter(format!("n{}i{}", owner, index))
    }

    pub fn enter_row_slot(&mut self, index: usize) -> usize {
        self.enter(format!("row{}", index))
    }

    pub fn enter_column_slot(&mut self, index: usize) -> usize {
        self.enter(format!("col{}", index))
    }

    fn enter(&mut self, segment: String) -> usize {
        let mark = self.segments.len();
        self.segments.push(segment);
        mark
    }

    /// Pop back to a mark returned by one of the `enter_*` methods.
    pub fn reset(&mut self, mark: usize) {
        self.segments.truncate(mark.max(1));
    }
}
