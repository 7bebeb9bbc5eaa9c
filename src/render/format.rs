// src/render/format.rs

/// `1234567` → `"1,234,567"`
pub fn thousands(v: i64) -> String {
    let digits = v.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if v < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Always carries a sign: `+1,234`, `-56`, `+0`.
pub fn signed_thousands(v: i64) -> String {
    if v < 0 {
        thousands(v)
    } else {
        format!("+{}", thousands(v))
    }
}

/// Round to the nearest integer, then group digits.
pub fn thousands_f64(v: f64) -> String {
    thousands(v.round() as i64)
}
