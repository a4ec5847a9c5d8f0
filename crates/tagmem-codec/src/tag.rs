//! Deterministic type tags.
//!
//! A tag is a positional checksum of a label's UTF-16 code units:
//! `sum(unit[i] * (i + 1))` wrapped to 32 bits. It is cheap, stable
//! across runs and platforms, and not collision-free; the registry
//! reports collisions when it sees them.

use std::fmt;

/// Hash a label to its 32-bit tag.
pub fn tag_of(label: &str) -> u32 {
    label
        .encode_utf16()
        .zip(1u32..)
        .fold(0u32, |acc, (unit, weight)| {
            acc.wrapping_add((unit as u32).wrapping_mul(weight))
        })
}

/// Build the constant-style label for `prefix + name + suffix`.
///
/// A `_` is inserted before every character that is its own uppercase
/// form when the preceding character is not, unless either one is
/// already `_`. The result is then uppercased. Digits count as their own
/// uppercase form, so `Uint8Array` becomes `UINT_8ARRAY`.
pub fn label_of(prefix: &str, name: &str, suffix: &str) -> String {
    let joined: Vec<char> = prefix.chars().chain(name.chars()).chain(suffix.chars()).collect();
    let mut label = String::with_capacity(joined.len() + 4);
    for (i, &c) in joined.iter().enumerate() {
        if i > 0 && is_upper_fixed(c) {
            let p = joined[i - 1];
            if !is_upper_fixed(p) && p != '_' && c != '_' {
                label.push('_');
            }
        }
        label.push(c);
    }
    label.to_uppercase()
}

fn is_upper_fixed(c: char) -> bool {
    let mut upper = c.to_uppercase();
    upper.next() == Some(c) && upper.next().is_none()
}

/// A registered type: its label, the name it was registered under, and
/// the tag of the label.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TypeDescriptor {
    label: String,
    name: String,
    value: u32,
}

impl TypeDescriptor {
    /// Build a descriptor for `name` in the namespace given by `prefix`
    /// and `suffix`. Pure; no registry involved.
    pub fn new(name: &str, prefix: &str, suffix: &str) -> Self {
        let label = label_of(prefix, name, suffix);
        let value = tag_of(&label);
        Self {
            label,
            name: name.to_owned(),
            value,
        }
    }

    /// Constant-style label, e.g. `TYPEOF_NUMBER`.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Name as registered, e.g. `number`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The tag.
    pub fn value(&self) -> u32 {
        self.value
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}
