mod common;

use common::{crate_def_map, crate_def_map_with_edition};
use defmap_item_tree::{Edition, Item, ModuleItems, RawVisibility};
use defmap_nameres::{DefDiagnostic, DefMap, LocalModuleId, Visibility};

fn value_visibility(def_map: &DefMap, module: LocalModuleId, name: &str) -> Visibility {
    def_map.get(module, name).and_then(|def| def.values.as_ref()).map(|item| item.visibility).unwrap()
}

fn restricted_to(def_map: &DefMap, module: &str) -> Visibility {
    Visibility::Restricted(def_map.module_id(def_map.module_by_text(module).unwrap()))
}

#[test]
fn test_keyword_visibilities() {
    let def_map = crate_def_map(
        ModuleItems::new().item(Item::module(
            "a",
            ModuleItems::new().item(Item::module(
                "b",
                ModuleItems::new()
                    .item(Item::function("private"))
                    .item(Item::function("own").with_visibility(RawVisibility::SelfModule))
                    .item(Item::function("parent").with_visibility(RawVisibility::Super))
                    .item(Item::function("krate").with_visibility(RawVisibility::Crate))
                    .item(Item::function("public").public()),
            )),
        )),
    );
    let b = def_map.module_by_text("a::b").unwrap();

    assert_eq!(value_visibility(&def_map, b, "private"), restricted_to(&def_map, "a::b"));
    assert_eq!(value_visibility(&def_map, b, "own"), restricted_to(&def_map, "a::b"));
    assert_eq!(value_visibility(&def_map, b, "parent"), restricted_to(&def_map, "a"));
    assert_eq!(value_visibility(&def_map, b, "krate"), restricted_to(&def_map, "crate"));
    assert_eq!(value_visibility(&def_map, b, "public"), Visibility::Public);
}

#[test]
fn test_pub_super_at_crate_root_is_public() {
    let def_map =
        crate_def_map(ModuleItems::new().item(Item::function("f").with_visibility(RawVisibility::Super)));
    assert_eq!(value_visibility(&def_map, def_map.root(), "f"), Visibility::Public);
    assert!(def_map.diagnostics().is_empty());
}

#[test]
fn test_restricted_visibility_to_ancestor() {
    let def_map = crate_def_map(
        ModuleItems::new().item(Item::module(
            "a",
            ModuleItems::new().item(Item::module(
                "inner",
                ModuleItems::new()
                    .item(Item::function("h").with_visibility(RawVisibility::In("crate::a".to_string())))
                    .item(Item::function("k").with_visibility(RawVisibility::In("super".to_string())))
                    .item(Item::function("j").with_visibility(RawVisibility::In("crate".to_string()))),
            )),
        )),
    );
    let inner = def_map.module_by_text("a::inner").unwrap();

    assert_eq!(value_visibility(&def_map, inner, "h"), restricted_to(&def_map, "a"));
    assert_eq!(value_visibility(&def_map, inner, "k"), restricted_to(&def_map, "a"));
    assert_eq!(value_visibility(&def_map, inner, "j"), restricted_to(&def_map, "crate"));
    assert!(def_map.diagnostics().is_empty());
}

#[test]
fn test_restriction_to_non_ancestor_degrades_to_public() {
    let def_map = crate_def_map(
        ModuleItems::new()
            .item(Item::module(
                "a",
                ModuleItems::new()
                    .item(Item::function("g").with_visibility(RawVisibility::In("crate::x".to_string()))),
            ))
            .item(Item::module("x", ModuleItems::new()))
            .item(Item::module("b", ModuleItems::new().use_path("crate::a::g"))),
    );
    let a = def_map.module_by_text("a").unwrap();
    let b = def_map.module_by_text("b").unwrap();

    assert_eq!(value_visibility(&def_map, a, "g"), Visibility::Public);
    assert!(def_map.get(b, "g").is_some());
    assert_eq!(
        def_map.diagnostics(),
        &[DefDiagnostic::UnresolvedVisibility {
            module: "crate::a".to_string(),
            name: "g".to_string(),
            path: "crate::x".to_string(),
        }]
    );
}

#[test]
fn test_restriction_past_the_root_degrades_to_public() {
    let def_map = crate_def_map(ModuleItems::new().item(Item::module(
        "a",
        ModuleItems::new().item(Item::function("g").with_visibility(RawVisibility::In("super::super".to_string()))),
    )));
    let a = def_map.module_by_text("a").unwrap();

    assert_eq!(value_visibility(&def_map, a, "g"), Visibility::Public);
    assert_eq!(def_map.diagnostics().len(), 1);
}

#[test]
fn test_plain_restriction_path_depends_on_edition() {
    let root = ModuleItems::new().item(Item::module(
        "a",
        ModuleItems::new().item(Item::module(
            "b",
            ModuleItems::new().item(Item::function("f").with_visibility(RawVisibility::In("a".to_string()))),
        )),
    ));

    let def_map = crate_def_map_with_edition(root.clone(), Edition::Edition2015);
    let b = def_map.module_by_text("a::b").unwrap();
    assert_eq!(value_visibility(&def_map, b, "f"), restricted_to(&def_map, "a"));

    let def_map = crate_def_map_with_edition(root, Edition::Edition2018);
    let b = def_map.module_by_text("a::b").unwrap();
    assert_eq!(value_visibility(&def_map, b, "f"), Visibility::Public);
    assert!(matches!(def_map.diagnostics(), [DefDiagnostic::UnresolvedVisibility { .. }]));
}

#[test]
fn test_enum_variants_share_the_enum_visibility() {
    let def_map = crate_def_map(ModuleItems::new().item(Item::module(
        "m",
        ModuleItems::new()
            .item(Item::enum_def("Open", vec![defmap_item_tree::Variant::unit("A")]).public())
            .item(Item::enum_def("Closed", vec![defmap_item_tree::Variant::unit("B")])),
    )));
    let open = def_map.module_by_text("m::Open").unwrap();
    let closed = def_map.module_by_text("m::Closed").unwrap();

    assert_eq!(value_visibility(&def_map, open, "A"), Visibility::Public);
    assert_eq!(value_visibility(&def_map, closed, "B"), restricted_to(&def_map, "m"));
}

#[test]
fn test_visibility_ordering() {
    let def_map = crate_def_map(ModuleItems::new().item(Item::module(
        "a",
        ModuleItems::new().item(Item::module("b", ModuleItems::new())),
    )));
    let root = restricted_to(&def_map, "crate");
    let a = restricted_to(&def_map, "a");
    let b = restricted_to(&def_map, "a::b");

    assert!(Visibility::Public.is_more_permissive_than(root, &def_map));
    assert!(root.is_more_permissive_than(a, &def_map));
    assert!(a.is_more_permissive_than(b, &def_map));
    assert!(!b.is_more_permissive_than(a, &def_map));
    assert!(!a.is_more_permissive_than(a, &def_map));

    assert_eq!(Visibility::Public.min(a, &def_map), a);
    assert_eq!(a.min(b, &def_map), b);
    assert_eq!(b.min(root, &def_map), b);
    assert_eq!(Visibility::Public.min(Visibility::Public, &def_map), Visibility::Public);

    let b_id = def_map.module_by_text("a::b").unwrap();
    assert!(a.is_visible_from(&def_map, b_id));
    assert!(!b.is_visible_from(&def_map, def_map.root()));
}
