/// Hexdump memory based on Linux `hexdump`.
///
/// Each row starts with the absolute address of its first byte followed by `stride` bytes shown
/// as little-endian half-words. A row identical to the one above it is printed as a single `*`,
/// and the dump ends with the address one past the last byte.
pub fn hexdump(memory: &[u8], base_address: u32, stride: usize) -> String {
    let stride = stride.max(2);
    let mut rows = Vec::new();
    let mut previous: Option<&[u8]> = None;
    let mut collapsed = false;

    for (line, row) in memory.chunks(stride).enumerate() {
        if previous == Some(row) {
            if !collapsed {
                rows.push("*".to_string());
                collapsed = true;
            }
            continue;
        }
        previous = Some(row);
        collapsed = false;

        let address = base_address as usize + line * stride;
        let words: Vec<String> = row
            .chunks(2)
            .map(|bytes| {
                let word = u16::from_le_bytes([bytes[0], bytes.get(1).copied().unwrap_or(0)]);
                format!("{:04x}", word)
            })
            .collect();
        rows.push(format!("{:08x} {}", address, words.join(" ")));
    }
    rows.push(format!("{:08x}", base_address as usize + memory.len()));

    rows.join("\n")
}
