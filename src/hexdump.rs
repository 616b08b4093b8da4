/// Hexdump a program, `stride` bytes per line, each line prefixed with its offset.
///
/// ```text
/// 00000000: 10 6c 0a 40 4c 10 80 00
/// 00000008: 40 5e 03 01
/// ```
pub fn hexdump(program: &[u8], stride: usize) -> String {
    let stride = stride.max(1);
    program
        .chunks(stride)
        .enumerate()
        .map(|(line, bytes)| {
            let mut str = format!("{:08x}:", line * stride);
            for byte in bytes {
                str.push_str(&format!(" {:02x}", byte));
            }
            str
        })
        .collect::<Vec<String>>()
        .join("\n")
}
