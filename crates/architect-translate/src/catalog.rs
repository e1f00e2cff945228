use std::collections::HashMap;

use thiserror::Error;

/// Shape symbol asking the expander to encode the inline `customSVG` payload.
pub const GENERATED_SYMBOL: &str = "GENERATED";

/// Symbol standing in for a reference that no catalog entry matches.
pub const CUSTOM_SYMBOL: &str = "CUSTOM";

/// Shape assumed when a response names no shape at all.
pub const DEFAULT_SHAPE_SYMBOL: &str = "FLARE";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("symbol '{0}' is reserved")]
    ReservedSymbol(String),
    #[error("duplicate symbol '{0}'")]
    DuplicateSymbol(String),
    #[error("symbol '{symbol}' repeats the reference of '{existing}'")]
    DuplicateReference { symbol: String, existing: String },
}

/// Bidirectional symbol ↔ resource reference table.
///
/// Built once at startup and only read afterwards.
#[derive(Debug, Clone, Default)]
pub struct ResourceCatalog {
    /// Symbol → reference.
    symbol_to_reference: HashMap<String, String>,
    /// Reference → symbol.
    reference_to_symbol: HashMap<String, String>,
    /// Symbols in insertion order, for prompts and schemas.
    symbols: Vec<String>,
}

impl ResourceCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry. Symbols and references must both be unique.
    pub fn insert(
        &mut self,
        symbol: impl Into<String>,
        reference: impl Into<String>,
    ) -> Result<(), CatalogError> {
        let symbol = symbol.into();
        let reference = reference.into();

        if symbol.eq_ignore_ascii_case(CUSTOM_SYMBOL)
            || symbol.eq_ignore_ascii_case(GENERATED_SYMBOL)
        {
            return Err(CatalogError::ReservedSymbol(symbol));
        }
        if self.find(&symbol).is_some() {
            return Err(CatalogError::DuplicateSymbol(symbol));
        }
        if let Some(existing) = self.reference_to_symbol.get(&reference) {
            return Err(CatalogError::DuplicateReference {
                symbol,
                existing: existing.clone(),
            });
        }

        self.symbol_to_reference.insert(symbol.clone(), reference.clone());
        self.reference_to_symbol.insert(reference, symbol.clone());
        self.symbols.push(symbol);
        Ok(())
    }

    /// Resolve a symbol. Exact matches win; otherwise case is ignored.
    pub fn reference(&self, symbol: &str) -> Option<&str> {
        self.find(symbol)
            .and_then(|s| self.symbol_to_reference.get(s))
            .map(String::as_str)
    }

    /// Reverse lookup by exact reference.
    pub fn symbol(&self, reference: &str) -> Option<&str> {
        self.reference_to_symbol.get(reference).map(String::as_str)
    }

    /// Symbols in the order they were inserted.
    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.symbols.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    fn find(&self, symbol: &str) -> Option<&String> {
        self.symbols
            .iter()
            .find(|s| s.as_str() == symbol)
            .or_else(|| self.symbols.iter().find(|s| s.eq_ignore_ascii_case(symbol)))
    }
}

/// The two fixed catalogs the pipeline translates against.
#[derive(Debug, Clone, Default)]
pub struct Catalogs {
    pub shapes: ResourceCatalog,
    pub noise: ResourceCatalog,
}
