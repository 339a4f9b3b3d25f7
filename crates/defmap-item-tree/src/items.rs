//! The item tree handed to the resolver: one `ModuleItems` per syntactic
//! module, with declarations, flattened `use` leaves and `extern crate`s in
//! source order.

use serde::{Deserialize, Serialize};

use crate::visibility::RawVisibility;

/// The contents of one syntactic module.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleItems {
    /// Named declarations, in source order. Child modules live here too.
    #[serde(default)]
    pub items: Vec<Item>,
    /// `use` declarations, one entry per leaf of the use tree.
    #[serde(default)]
    pub uses: Vec<UseItem>,
    /// `extern crate` declarations.
    #[serde(default)]
    pub extern_crates: Vec<ExternCrateItem>,
}

impl ModuleItems {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn item(mut self, item: Item) -> Self {
        self.items.push(item);
        self
    }

    pub fn use_item(mut self, use_item: UseItem) -> Self {
        self.uses.push(use_item);
        self
    }

    /// `use path;`
    pub fn use_path(self, path: &str) -> Self {
        self.use_item(UseItem::new(path))
    }

    /// `use path::*;`
    pub fn use_glob(self, path: &str) -> Self {
        self.use_item(UseItem::new(path).glob())
    }

    pub fn extern_crate(mut self, extern_crate: ExternCrateItem) -> Self {
        self.extern_crates.push(extern_crate);
        self
    }

    /// Iterates over the direct child module declarations.
    pub fn child_modules(&self) -> impl Iterator<Item = (&Item, &ModuleItems)> {
        self.items.iter().filter_map(|item| match &item.kind {
            ItemKind::Module(body) => Some((item, body)),
            _ => None,
        })
    }
}

/// A named declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// `None` only for malformed input; such items are skipped.
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub visibility: RawVisibility,
    #[serde(flatten)]
    pub kind: ItemKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ItemKind {
    Module(ModuleItems),
    Enum {
        #[serde(default)]
        variants: Vec<Variant>,
    },
    Struct {
        #[serde(default)]
        shape: FieldShape,
    },
    Union,
    Trait,
    TypeAlias,
    Function,
    Const,
    Static,
    Macro {
        /// `#[macro_export]`: the macro is declared at the crate root.
        #[serde(default)]
        macro_export: bool,
    },
}

/// Which namespaces a declaration occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NamespaceShape {
    pub types: bool,
    pub values: bool,
    pub macros: bool,
}

impl NamespaceShape {
    pub const TYPES: NamespaceShape = NamespaceShape { types: true, values: false, macros: false };
    pub const VALUES: NamespaceShape = NamespaceShape { types: false, values: true, macros: false };
    pub const MACROS: NamespaceShape = NamespaceShape { types: false, values: false, macros: true };
    pub const TYPES_AND_VALUES: NamespaceShape =
        NamespaceShape { types: true, values: true, macros: false };
}

impl ItemKind {
    pub fn namespaces(&self) -> NamespaceShape {
        match self {
            ItemKind::Module(_)
            | ItemKind::Enum { .. }
            | ItemKind::Union
            | ItemKind::Trait
            | ItemKind::TypeAlias => NamespaceShape::TYPES,
            ItemKind::Struct { shape } => shape.namespaces(),
            ItemKind::Function | ItemKind::Const | ItemKind::Static => NamespaceShape::VALUES,
            ItemKind::Macro { .. } => NamespaceShape::MACROS,
        }
    }

    /// Modules and enums are the only items that can host nested names.
    pub fn is_module_or_enum(&self) -> bool {
        matches!(self, ItemKind::Module(_) | ItemKind::Enum { .. })
    }
}

/// Field layout of a struct or enum variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldShape {
    /// `{ a: T }`
    #[default]
    Record,
    /// `(T)`
    Tuple,
    /// no fields
    Unit,
}

impl FieldShape {
    /// Record structs and variants only occupy the type namespace; tuple and
    /// unit ones also define a constructor value.
    pub fn namespaces(self) -> NamespaceShape {
        match self {
            FieldShape::Record => NamespaceShape::TYPES,
            FieldShape::Tuple | FieldShape::Unit => NamespaceShape::TYPES_AND_VALUES,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variant {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub shape: FieldShape,
}

impl Variant {
    pub fn new(name: &str, shape: FieldShape) -> Self {
        Self { name: Some(name.to_string()), shape }
    }

    pub fn unit(name: &str) -> Self {
        Self::new(name, FieldShape::Unit)
    }
}

/// One leaf of a `use` tree, e.g. `use a::b::{c as d, e::*}` yields two.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UseItem {
    /// The imported path. A trailing `::*` makes this a glob import, same as
    /// setting `glob`.
    pub path: String,
    #[serde(default)]
    pub alias: Option<String>,
    #[serde(default)]
    pub glob: bool,
    #[serde(default)]
    pub visibility: RawVisibility,
}

impl UseItem {
    pub fn new(path: &str) -> Self {
        Self { path: path.to_string(), alias: None, glob: false, visibility: RawVisibility::Private }
    }

    pub fn alias(mut self, alias: &str) -> Self {
        self.alias = Some(alias.to_string());
        self
    }

    pub fn glob(mut self) -> Self {
        self.glob = true;
        self
    }

    pub fn public(self) -> Self {
        self.with_visibility(RawVisibility::Public)
    }

    pub fn with_visibility(mut self, visibility: RawVisibility) -> Self {
        self.visibility = visibility;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternCrateItem {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub alias: Option<String>,
    #[serde(default)]
    pub macro_use: bool,
    #[serde(default)]
    pub visibility: RawVisibility,
}

impl ExternCrateItem {
    pub fn new(name: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            alias: None,
            macro_use: false,
            visibility: RawVisibility::Private,
        }
    }

    pub fn alias(mut self, alias: &str) -> Self {
        self.alias = Some(alias.to_string());
        self
    }

    pub fn macro_use(mut self) -> Self {
        self.macro_use = true;
        self
    }

    pub fn public(mut self) -> Self {
        self.visibility = RawVisibility::Public;
        self
    }
}

// Item constructors, mostly for tests and tools that build trees by hand.
impl Item {
    pub fn new(name: &str, kind: ItemKind) -> Self {
        Self { name: Some(name.to_string()), visibility: RawVisibility::Private, kind }
    }

    pub fn unnamed(kind: ItemKind) -> Self {
        Self { name: None, visibility: RawVisibility::Private, kind }
    }

    pub fn module(name: &str, body: ModuleItems) -> Self {
        Self::new(name, ItemKind::Module(body))
    }

    pub fn enum_def(name: &str, variants: Vec<Variant>) -> Self {
        Self::new(name, ItemKind::Enum { variants })
    }

    pub fn struct_def(name: &str, shape: FieldShape) -> Self {
        Self::new(name, ItemKind::Struct { shape })
    }

    pub fn function(name: &str) -> Self {
        Self::new(name, ItemKind::Function)
    }

    pub fn constant(name: &str) -> Self {
        Self::new(name, ItemKind::Const)
    }

    pub fn trait_def(name: &str) -> Self {
        Self::new(name, ItemKind::Trait)
    }

    pub fn type_alias(name: &str) -> Self {
        Self::new(name, ItemKind::TypeAlias)
    }

    pub fn macro_def(name: &str, macro_export: bool) -> Self {
        Self::new(name, ItemKind::Macro { macro_export })
    }

    pub fn public(self) -> Self {
        self.with_visibility(RawVisibility::Public)
    }

    pub fn with_visibility(mut self, visibility: RawVisibility) -> Self {
        self.visibility = visibility;
        self
    }
}
