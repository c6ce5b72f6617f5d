use crate::config::MIN_TARGET_COVERAGE;

/// True when the alignment spans strictly more than [`MIN_TARGET_COVERAGE`]
/// of the target. Exactly half is rejected.
pub fn accept(aln_len: u64, target_len: u64) -> bool {
    aln_len as f64 > MIN_TARGET_COVERAGE * target_len as f64
}
