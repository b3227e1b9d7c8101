//! User-defined function descriptors referenced by call expressions.
use std::{cell::RefCell, collections::HashMap, fmt, hash::Hash};

use log::{debug, warn};
use typed_arena::Arena;

/// A named function registered in an [`ExprFactory`](crate::factory::ExprFactory).
#[derive(Debug, PartialEq, Eq)]
pub struct FunctionInfo {
    name: String,
    index: usize,
}

/// Handle to a registered function.
///
/// The default value is the *invalid function*; [`ExprFactory::begin_call`] rejects
/// it with [`ExprError::InvalidFunction`](crate::error::ExprError::InvalidFunction).
///
/// [`ExprFactory::begin_call`]: crate::factory::ExprFactory::begin_call
#[derive(Clone, Copy, Default)]
pub struct Function<'a>(Option<&'a FunctionInfo>);

impl<'a> Function<'a> {
    #[inline]
    pub(crate) fn from_info(info: &'a FunctionInfo) -> Self {
        Function(Some(info))
    }

    #[inline]
    pub(crate) fn info(&self) -> Option<&'a FunctionInfo> {
        self.0
    }

    /// `true` for the invalid (default) function.
    #[inline]
    pub fn is_null(&self) -> bool {
        self.0.is_none()
    }

    /// Name the function was registered with.
    ///
    /// # Panics
    /// If the handle is null.
    pub fn name(&self) -> &'a str {
        &self.get().name
    }

    /// Position of the function in the registry of its factory.
    ///
    /// # Panics
    /// If the handle is null.
    pub fn index(&self) -> usize {
        self.get().index
    }

    #[track_caller]
    fn get(&self) -> &'a FunctionInfo {
        match self.0 {
            Some(info) => info,
            None => panic!("attempted to read through a null Function handle"),
        }
    }
}

impl PartialEq for Function<'_> {
    fn eq(&self, other: &Self) -> bool {
        match (self.0, other.0) {
            (Some(a), Some(b)) => std::ptr::eq(a, b),
            (None, None) => true,
            _ => false,
        }
    }
}

impl Eq for Function<'_> {}

impl Hash for Function<'_> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.0.map(|info| info as *const FunctionInfo).hash(state)
    }
}

impl fmt::Debug for Function<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(info) => write!(f, "Function({}#{})", info.name, info.index),
            None => f.write_str("Function(null)"),
        }
    }
}

/// Append-only registry of function descriptors.
///
/// Descriptors live in a `typed_arena` so their addresses never move; the
/// registry keeps them in insertion order and indexes the first descriptor of
/// every name.
pub(crate) struct FunctionRegistry<'a> {
    arena: Arena<FunctionInfo>,
    entries: RefCell<Vec<&'a FunctionInfo>>,
    by_name: RefCell<HashMap<String, usize>>,
}

impl<'a> FunctionRegistry<'a> {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            entries: RefCell::new(Vec::new()),
            by_name: RefCell::new(HashMap::new()),
        }
    }

    pub fn add(&'a self, name: &str) -> Function<'a> {
        let mut entries = self.entries.borrow_mut();
        let index = entries.len();
        let info: &'a FunctionInfo = self.arena.alloc(FunctionInfo {
            name: name.to_owned(),
            index,
        });
        entries.push(info);

        let mut by_name = self.by_name.borrow_mut();
        if let Some(&first) = by_name.get(name) {
            warn!("Function `{name}` registered again as #{index}; lookups by name keep #{first}.");
        } else {
            by_name.insert(name.to_owned(), index);
            debug!("Registered function `{name}` as #{index}.");
        }

        Function::from_info(info)
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn get(&self, index: usize) -> Option<Function<'a>> {
        self.entries
            .borrow()
            .get(index)
            .copied()
            .map(Function::from_info)
    }

    pub fn find(&self, name: &str) -> Option<Function<'a>> {
        let index = *self.by_name.borrow().get(name)?;
        self.get(index)
    }

    /// Whether `info` was allocated by this registry.
    pub fn owns(&self, info: &FunctionInfo) -> bool {
        self.entries
            .borrow()
            .get(info.index)
            .is_some_and(|entry| std::ptr::eq(*entry, info))
    }
}
