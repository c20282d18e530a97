use std::collections::BTreeMap;

/// One `#define` as it appeared in a predefined-macro dump.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MacroDef {
    /// Parameter names for function-like macros.
    pub params: Option<Vec<String>>,
    /// Replacement text, trimmed; empty for `#define NAME`.
    pub value: String,
    /// 1-based line of the definition.
    pub line: u32,
}

/// Predefined macros of one compiler invocation, by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MacroTable {
    defs: BTreeMap<String, MacroDef>,
}

impl MacroTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Define (or redefine) an object-like macro.
    pub fn define(&mut self, name: &str, value: &str) {
        self.insert(
            name,
            MacroDef {
                params: None,
                value: value.trim().to_string(),
                line: 0,
            },
        );
    }

    pub fn insert(&mut self, name: &str, def: MacroDef) {
        self.defs.insert(name.to_string(), def);
    }

    pub fn undef(&mut self, name: &str) {
        self.defs.remove(name);
    }

    pub fn is_defined(&self, name: &str) -> bool {
        self.defs.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&MacroDef> {
        self.defs.get(name)
    }

    pub fn value(&self, name: &str) -> Option<&str> {
        self.defs.get(name).map(|d| d.value.as_str())
    }

    /// Value of an object-like macro read as a C integer constant.
    pub fn int_value(&self, name: &str) -> Option<u64> {
        let def = self.defs.get(name)?;
        if def.params.is_some() {
            return None;
        }
        parse_c_int(&def.value)
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }
}

/// Decimal or hex integer with optional `u`/`l` suffixes, e.g. `1930`, `0x10UL`.
fn parse_c_int(text: &str) -> Option<u64> {
    let body = text.trim().trim_end_matches(['u', 'U', 'l', 'L']);
    if let Some(hex) = body.strip_prefix("0x").or_else(|| body.strip_prefix("0X")) {
        u64::from_str_radix(hex, 16).ok()
    } else {
        body.parse().ok()
    }
}
