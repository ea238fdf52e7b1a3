// libt1/src/protocol/checksum.rs

/// Compute the Longitudinal Redundancy Check (LRC) of a T=1 block
/// LRC = NAD ^ PCB ^ LEN ^ INF[0] ^ ... ^ INF[LEN-1]
pub fn lrc(bytes: &[u8]) -> u8 {
    bytes.iter().fold(0u8, |acc, &b| acc ^ b)
}
