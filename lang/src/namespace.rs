//! Identifier → address allocator, the compiler's single authority for
//! variable placement (§4.4).

use crate::error::NamespaceError;

const ADDRESS_SPACE: u8 = 64;

#[derive(Clone, Eq, PartialEq, Debug)]
pub struct Var {
    pub name: String,
    pub var_type: String,
    pub addr: u8,
}

/// A list of bindings. A child namespace copies its parent's bindings
/// by value (`Namespace::child`); mutations on the child never
/// propagate back to the parent.
#[derive(Clone, Default, Debug)]
pub struct Namespace {
    vars: Vec<Var>,
}

impl Namespace {
    pub fn new() -> Self {
        Namespace { vars: Vec::new() }
    }

    pub fn child(&self) -> Self {
        self.clone()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.vars.iter().any(|v| v.name == name)
    }

    pub fn get(&self, name: &str) -> Result<&Var, NamespaceError> {
        self.vars
            .iter()
            .find(|v| v.name == name)
            .ok_or_else(|| NamespaceError::UnknownIdentifier(name.to_owned()))
    }

    fn address_occupied(&self, addr: u8) -> bool {
        self.vars.iter().any(|v| v.addr == addr)
    }

    /// Unused addresses in `[0, limit)`, lowest first.
    pub fn free_addresses(&self, limit: u8) -> Vec<u8> {
        (0..limit).filter(|&addr| !self.address_occupied(addr)).collect()
    }

    fn free_address(&self) -> Result<u8, NamespaceError> {
        self.free_addresses(ADDRESS_SPACE)
            .into_iter()
            .next()
            .ok_or(NamespaceError::NoFreeAddress)
    }

    /// Binds `name` to the lowest unoccupied address in `[0, 64)`.
    pub fn add_identifier(&mut self, name: &str, var_type: &str) -> Result<Var, NamespaceError> {
        let addr = self.free_address()?;
        let var = Var {
            name: name.to_owned(),
            var_type: var_type.to_owned(),
            addr,
        };
        self.vars.push(var.clone());
        Ok(var)
    }

    pub fn remove(&mut self, name: &str) {
        self.vars.retain(|v| v.name != name);
    }

    /// Releases every codegen-internal scratch binding (`__`-prefixed,
    /// never a valid user identifier per the lexer's alphabetic-only
    /// rule) so a statement's temporaries don't permanently eat into
    /// the 64-address space for the rest of the block.
    pub fn drop_temporaries(&mut self) {
        self.vars.retain(|v| !v.name.starts_with("__"));
    }

    /// Addresses `0..25` render as `@A`..`@Z` (the assembler's
    /// pre-seeded register macros); everything else renders as decimal.
    pub fn addr_as_str(addr: u8) -> String {
        if addr < 26 {
            format!("@{}", (b'A' + addr) as char)
        } else {
            addr.to_string()
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn allocates_lowest_free_address() {
        let mut ns = Namespace::new();
        let a = ns.add_identifier("x", "int").unwrap();
        let b = ns.add_identifier("y", "int").unwrap();
        assert_eq!(a.addr, 0);
        assert_eq!(b.addr, 1);
    }

    #[test]
    fn reuses_address_freed_by_remove() {
        let mut ns = Namespace::new();
        ns.add_identifier("x", "int").unwrap();
        ns.remove("x");
        let y = ns.add_identifier("y", "int").unwrap();
        assert_eq!(y.addr, 0);
    }

    #[test]
    fn child_mutations_do_not_leak_to_parent() {
        let parent = {
            let mut ns = Namespace::new();
            ns.add_identifier("x", "int").unwrap();
            ns
        };
        let mut child = parent.child();
        child.add_identifier("y", "int").unwrap();
        assert!(child.contains("y"));
        assert!(!parent.contains("y"));
    }

    #[test]
    fn addr_as_str_uses_letters_below_26() {
        assert_eq!(Namespace::addr_as_str(0), "@A");
        assert_eq!(Namespace::addr_as_str(25), "@Z");
        assert_eq!(Namespace::addr_as_str(26), "26");
    }

    #[test]
    fn lookup_of_unbound_name_is_an_error() {
        let ns = Namespace::new();
        assert!(ns.get("nope").is_err());
    }

    #[test]
    fn drop_temporaries_frees_only_double_underscore_names() {
        let mut ns = Namespace::new();
        ns.add_identifier("x", "int").unwrap();
        ns.add_identifier("__t1", "tmp").unwrap();
        ns.drop_temporaries();
        assert!(ns.contains("x"));
        assert!(!ns.contains("__t1"));
    }
}
