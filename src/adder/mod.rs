//! Two-field adder
//!
//! Operands are stored as the raw text the user typed. Nothing is validated
//! on input; text is only coerced to numbers when `add` runs, and anything
//! that is not a number simply turns the sum into NaN.

/// Which of the two operand fields an edit applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    First,
    Second,
}

impl Operand {
    pub fn other(self) -> Self {
        match self {
            Operand::First => Operand::Second,
            Operand::Second => Operand::First,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AdderState {
    first_operand: String,
    second_operand: String,
    sum: Option<f64>, // Only set once add() has run
}

impl AdderState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_first_operand(&mut self, text: impl Into<String>) {
        self.first_operand = text.into();
    }

    pub fn set_second_operand(&mut self, text: impl Into<String>) {
        self.second_operand = text.into();
    }

    pub fn operand(&self, which: Operand) -> &str {
        match which {
            Operand::First => &self.first_operand,
            Operand::Second => &self.second_operand,
        }
    }

    fn operand_mut(&mut self, which: Operand) -> &mut String {
        match which {
            Operand::First => &mut self.first_operand,
            Operand::Second => &mut self.second_operand,
        }
    }

    /// Append a typed character to a field
    pub fn push_char(&mut self, which: Operand, c: char) {
        self.operand_mut(which).push(c);
    }

    /// Remove the last character of a field (backspace)
    pub fn pop_char(&mut self, which: Operand) {
        self.operand_mut(which).pop();
    }

    /// Coerce both operands and store their sum.
    ///
    /// The sum is a snapshot: editing the operands afterwards does not
    /// change it until `add` is called again.
    pub fn add(&mut self) -> f64 {
        let sum = to_number(&self.first_operand) + to_number(&self.second_operand);
        self.sum = Some(sum);
        sum
    }

    pub fn sum(&self) -> Option<f64> {
        self.sum
    }

    /// Text shown for the sum, `None` until the first add
    pub fn sum_display(&self) -> Option<String> {
        self.sum.map(format_number)
    }

    /// Reset both fields and forget the sum
    pub fn clear(&mut self) {
        self.first_operand.clear();
        self.second_operand.clear();
        self.sum = None;
    }
}

/// Permissive text-to-number coercion.
///
/// Empty (or blank, byte order marks included) text is 0. Decimal
/// literals, `Infinity` and unsigned `0x`/`0o`/`0b` integers are accepted;
/// everything else is NaN.
pub fn to_number(text: &str) -> f64 {
    // U+FEFF is not Unicode White_Space but still counts as blank here
    let s = text.trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}');
    if s.is_empty() {
        return 0.0;
    }

    match s {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }

    if let Some(value) = parse_radix_literal(s) {
        return value;
    }

    if is_decimal_literal(s) {
        s.parse::<f64>().unwrap_or(f64::NAN)
    } else {
        f64::NAN
    }
}

/// `0x1F`, `0o17`, `0b101`. Signs are not allowed with a prefix.
fn parse_radix_literal(s: &str) -> Option<f64> {
    let bytes = s.as_bytes();
    if bytes.len() < 2 || bytes[0] != b'0' {
        return None;
    }

    let radix = match bytes[1] {
        b'x' | b'X' => 16,
        b'o' | b'O' => 8,
        b'b' | b'B' => 2,
        _ => return None,
    };

    let digits = &s[2..];
    if digits.is_empty() {
        return Some(f64::NAN);
    }

    // Accumulate in f64 so long literals lose precision instead of overflowing
    let mut value = 0.0_f64;
    for c in digits.chars() {
        match c.to_digit(radix) {
            Some(d) => value = value * radix as f64 + d as f64,
            None => return Some(f64::NAN),
        }
    }
    Some(value)
}

/// `[+-]? (digits [. digits?] | . digits) ([eE] [+-]? digits)?`
///
/// Rust's float parser also takes `inf`, `nan` and friends, which must
/// coerce to NaN here, so the grammar is checked first.
fn is_decimal_literal(s: &str) -> bool {
    let bytes = s.as_bytes();
    let mut i = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        i += 1;
    }

    let int_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    let mut mantissa_digits = i - int_start;

    if i < bytes.len() && bytes[i] == b'.' {
        i += 1;
        let frac_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        mantissa_digits += i - frac_start;
    }

    if mantissa_digits == 0 {
        return false;
    }

    if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
        i += 1;
        if i < bytes.len() && (bytes[i] == b'+' || bytes[i] == b'-') {
            i += 1;
        }
        let exp_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        if i == exp_start {
            return false;
        }
    }

    i == bytes.len()
}

/// Render a number the way calculators on the web print them:
/// shortest round-trip digits, `NaN`, `Infinity`, and exponent form
/// (`1e+21`, `1e-7`) for very large or very small magnitudes.
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if value == 0.0 {
        return "0".to_string(); // also -0
    }

    let magnitude = value.abs();
    if magnitude >= 1e21 || magnitude < 1e-6 {
        let formatted = format!("{:e}", value);
        match formatted.split_once('e') {
            Some((mantissa, exp)) if !exp.starts_with('-') => format!("{}e+{}", mantissa, exp),
            _ => formatted,
        }
    } else {
        format!("{}", value)
    }
}
