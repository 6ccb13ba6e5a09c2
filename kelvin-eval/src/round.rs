// Rounding to a fixed number of decimal places, half away from zero.
//
// The rounding is done on the shortest decimal string that round-trips to
// the input, not on the binary value, so 2.675 (stored as 2.67499999...)
// rounds to 2.68 the way a reader of the printed number expects. Every
// aggregate in the workspace goes through this one function.

pub fn round_half_up(x: f64, scale: u32) -> f64 {
    if !x.is_finite() {
        return x;
    }
    let scale = scale as usize;
    let repr = format!("{}", x.abs());
    let (int_part, frac_part) = repr.split_once('.').unwrap_or((repr.as_str(), ""));
    if frac_part.len() <= scale {
        return x;
    }
    let mut digits: Vec<u8> = int_part
        .bytes()
        .chain(frac_part.bytes().take(scale))
        .map(|b| b - b'0')
        .collect();
    if frac_part.as_bytes()[scale] >= b'5' {
        let mut i = digits.len();
        loop {
            if i == 0 {
                digits.insert(0, 1);
                break;
            }
            i -= 1;
            if digits[i] == 9 {
                digits[i] = 0;
            } else {
                digits[i] += 1;
                break;
            }
        }
    }
    let split = digits.len() - scale;
    let mut s = String::with_capacity(digits.len() + 2);
    if x < 0.0 {
        s.push('-');
    }
    s.extend(digits[..split].iter().map(|d| char::from(b'0' + d)));
    if scale > 0 {
        s.push('.');
        s.extend(digits[split..].iter().map(|d| char::from(b'0' + d)));
    }
    match s.parse::<f64>() {
        // No negative zero out of rounding a small negative value.
        Ok(r) if r == 0.0 => 0.0,
        Ok(r) => r,
        Err(_) => x,
    }
}
