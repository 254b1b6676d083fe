use ahash::HashMap;
use ahash::HashMapExt;
use parking_lot::RwLock;
use parking_lot::RwLockReadGuard;
use parking_lot::RwLockWriteGuard;
use parse_js::ast::node::NodeAssocData;
use std::any::Any;
use std::fmt;
use std::fmt::Debug;
use std::fmt::Formatter;
use std::hash::Hash;
use std::hash::Hasher;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::sync::Weak;

/// Identity of one binding. Two declarations of the same name in the same scope share a symbol.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Symbol(u64);

impl Symbol {
  pub fn id(self) -> u64 {
    self.0
  }
}

#[derive(Clone, Default)]
pub struct SymbolGenerator(Arc<AtomicU64>);

impl SymbolGenerator {
  pub fn new() -> SymbolGenerator {
    SymbolGenerator::default()
  }

  pub fn next(&self) -> Symbol {
    Symbol(self.0.fetch_add(1, Ordering::Relaxed))
  }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum ScopeType {
  Global,
  Module,
  Class,
  // Functions with their own `this` and `arguments`.
  NonArrowFunction,
  ArrowFunction,
  Block,
}

impl ScopeType {
  /// Whether `var` declarations and hoisted functions land in this scope.
  pub fn is_closure(self) -> bool {
    match self {
      ScopeType::Global | ScopeType::Module | ScopeType::NonArrowFunction | ScopeType::ArrowFunction => {
        true
      }
      ScopeType::Class | ScopeType::Block => false,
    }
  }
}

/// How often a binding is declared and written, which decides whether its value can be trusted
/// everywhere it is read.
#[derive(Clone, Copy, Default, PartialEq, Eq, Debug)]
pub struct SymbolUsage {
  pub declarations: usize,
  pub assignments: usize,
}

impl SymbolUsage {
  pub fn is_constant(&self) -> bool {
    self.declarations == 1 && self.assignments == 0
  }
}

pub struct ScopeData {
  symbol_generator: SymbolGenerator,
  typ: ScopeType,
  parent: Option<Weak<RwLock<ScopeData>>>,
  children: Vec<Scope>,
  symbols: HashMap<String, Symbol>,
  // For deterministic iteration.
  symbol_declaration_order: Vec<String>,
  usage: HashMap<Symbol, SymbolUsage>,
  // Side tables that analyses hang off a scope, keyed by type.
  assoc: NodeAssocData,
}

impl ScopeData {
  pub fn typ(&self) -> ScopeType {
    self.typ
  }

  pub fn parent(&self) -> Option<Scope> {
    self.parent.as_ref()?.upgrade().map(Scope)
  }

  pub fn children(&self) -> &[Scope] {
    &self.children
  }

  pub fn symbol_count(&self) -> usize {
    self.symbols.len()
  }

  pub fn symbol_names(&self) -> &Vec<String> {
    &self.symbol_declaration_order
  }

  pub fn get_symbol(&self, name: &str) -> Option<Symbol> {
    self.symbols.get(name).copied()
  }

  /// Declares `name` in this scope, returning the existing symbol on redeclaration.
  pub fn add_symbol(&mut self, name: String) -> Symbol {
    let symbol = match self.symbols.get(&name) {
      Some(symbol) => *symbol,
      None => {
        let symbol = self.symbol_generator.next();
        self.symbols.insert(name.clone(), symbol);
        self.symbol_declaration_order.push(name);
        symbol
      }
    };
    self.usage.entry(symbol).or_default().declarations += 1;
    symbol
  }

  pub fn record_assignment(&mut self, symbol: Symbol) {
    self.usage.entry(symbol).or_default().assignments += 1;
  }

  pub fn symbol_usage(&self, symbol: Symbol) -> SymbolUsage {
    self.usage.get(&symbol).copied().unwrap_or_default()
  }

  pub fn get_assoc<T: Any>(&self) -> Option<&T> {
    self.assoc.get::<T>()
  }

  pub fn get_or_insert_assoc<T: Any + Default + Send + Sync>(&mut self) -> &mut T {
    if !self.assoc.has::<T>() {
      self.assoc.set(T::default());
    };
    self
      .assoc
      .get_mut::<T>()
      .expect("side table was just inserted")
  }
}

/// Shared handle to a scope. Equality and hashing are by identity.
#[derive(Clone)]
pub struct Scope(Arc<RwLock<ScopeData>>);

impl Scope {
  pub fn new(symbol_generator: SymbolGenerator, parent: Option<Scope>, typ: ScopeType) -> Scope {
    let scope = Scope(Arc::new(RwLock::new(ScopeData {
      symbol_generator,
      typ,
      parent: parent.as_ref().map(|p| Arc::downgrade(&p.0)),
      children: Vec::new(),
      symbols: HashMap::new(),
      symbol_declaration_order: Vec::new(),
      usage: HashMap::new(),
      assoc: NodeAssocData::default(),
    })));
    if let Some(parent) = parent {
      parent.data_mut().children.push(scope.clone());
    };
    scope
  }

  pub fn create_child_scope(&self, typ: ScopeType) -> Scope {
    let generator = self.data().symbol_generator.clone();
    Scope::new(generator, Some(self.clone()), typ)
  }

  pub fn data(&self) -> RwLockReadGuard<'_, ScopeData> {
    self.0.read()
  }

  pub fn data_mut(&self) -> RwLockWriteGuard<'_, ScopeData> {
    self.0.write()
  }

  pub fn parent(&self) -> Option<Scope> {
    self.data().parent()
  }

  /// This scope, then each enclosing scope up to the root.
  pub fn self_and_ancestors(&self) -> impl Iterator<Item = Scope> {
    std::iter::successors(Some(self.clone()), |scope| scope.parent())
  }

  /// The nearest self-or-ancestor scope that receives `var` declarations.
  pub fn find_closure(&self) -> Scope {
    self
      .self_and_ancestors()
      .find(|scope| scope.data().typ().is_closure())
      .unwrap_or_else(|| self.clone())
  }

  pub fn find_symbol(&self, name: &str) -> Option<Symbol> {
    self.find_symbol_with_scope(name).map(|(_, symbol)| symbol)
  }

  /// Resolves `name` outward from this scope, returning the declaring scope too.
  pub fn find_symbol_with_scope(&self, name: &str) -> Option<(Scope, Symbol)> {
    self.find_symbol_up_to_with_scope(name, |_| false)
  }

  /// Like [`Scope::find_symbol_with_scope`], but gives up after searching the first scope whose
  /// type matches `stop`.
  pub fn find_symbol_up_to_with_scope(
    &self,
    name: &str,
    stop: impl Fn(ScopeType) -> bool,
  ) -> Option<(Scope, Symbol)> {
    for scope in self.self_and_ancestors() {
      let (symbol, typ) = {
        let data = scope.data();
        (data.get_symbol(name), data.typ())
      };
      if let Some(symbol) = symbol {
        return Some((scope, symbol));
      };
      if stop(typ) {
        break;
      };
    }
    None
  }

  /// Usage of the binding `name` resolves to from here, if it is declared at all.
  pub fn resolve_usage(&self, name: &str) -> Option<SymbolUsage> {
    let (scope, symbol) = self.find_symbol_with_scope(name)?;
    let usage = scope.data().symbol_usage(symbol);
    Some(usage)
  }
}

impl PartialEq for Scope {
  fn eq(&self, other: &Self) -> bool {
    Arc::ptr_eq(&self.0, &other.0)
  }
}

impl Eq for Scope {}

impl Hash for Scope {
  fn hash<H: Hasher>(&self, state: &mut H) {
    (Arc::as_ptr(&self.0) as usize).hash(state);
  }
}

impl Debug for Scope {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    let data = self.data();
    f.debug_struct("Scope")
      .field("typ", &data.typ)
      .field("symbols", &data.symbol_declaration_order)
      .finish()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn redeclaration_reuses_symbol_and_is_not_constant() {
    let scope = Scope::new(SymbolGenerator::new(), None, ScopeType::Global);
    let first = scope.data_mut().add_symbol("a".into());
    let second = scope.data_mut().add_symbol("a".into());
    assert_eq!(first, second);
    assert_eq!(scope.data().symbol_count(), 1);
    assert!(!scope.data().symbol_usage(first).is_constant());

    let b = scope.data_mut().add_symbol("b".into());
    assert!(scope.data().symbol_usage(b).is_constant());
    scope.data_mut().record_assignment(b);
    assert!(!scope.data().symbol_usage(b).is_constant());
  }

  #[test]
  fn finds_nearest_closure() {
    let global = Scope::new(SymbolGenerator::new(), None, ScopeType::Global);
    let func = global.create_child_scope(ScopeType::NonArrowFunction);
    let block = func.create_child_scope(ScopeType::Block);
    let inner = block.create_child_scope(ScopeType::Block);
    assert_eq!(inner.find_closure(), func);
    assert_eq!(global.find_closure(), global);
    assert_eq!(inner.self_and_ancestors().count(), 4);
  }

  #[derive(Default)]
  struct Counter(usize);

  #[test]
  fn side_tables_are_created_on_first_access() {
    let scope = Scope::new(SymbolGenerator::new(), None, ScopeType::Global);
    assert!(scope.data().get_assoc::<Counter>().is_none());
    scope.data_mut().get_or_insert_assoc::<Counter>().0 += 1;
    scope.data_mut().get_or_insert_assoc::<Counter>().0 += 1;
    assert_eq!(scope.data().get_assoc::<Counter>().map(|c| c.0), Some(2));
  }
}
