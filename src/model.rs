/// Summary of the load operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoadReport {
    /// Variables written to the target.
    pub loaded: usize,
    /// Variables left alone because the target already defined them.
    pub skipped_existing: usize,
    /// Files parsed, excluding missing files that were ignored.
    pub files_read: usize,
}
