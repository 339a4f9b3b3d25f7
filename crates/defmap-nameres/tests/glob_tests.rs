mod common;

use common::{check, crate_def_map, init_logger};
use defmap_item_tree::{CrateData, CrateGraph, FieldShape, Item, ModuleItems, UseItem, Variant};
use defmap_nameres::{DefDatabase, DefMapError, Namespace, ResolveConfig, ResolveMode};
use expect_test::expect;

#[test]
fn test_glob_import_from_child_module() {
    let def_map = crate_def_map(
        ModuleItems::new()
            .use_glob("b")
            .item(Item::module("b", ModuleItems::new().item(Item::function("f").public())).public()),
    );

    expect![[r#"
        crate
        b: t
        f: v=crate::b::f

        crate::b
        f: v

    "#]]
    .assert_eq(&def_map.dump());

    let root = def_map.root();
    let bound = def_map.get(root, "f").and_then(|def| def.values.clone()).unwrap();
    assert_eq!(def_map.display_path(&bound.path), "crate::b::f");

    let resolved = def_map.resolve_path_str(root, "f", ResolveMode::Other);
    assert!(resolved.reached_fixedpoint);
    assert_eq!(resolved.resolved_def.values, Some(bound));
    assert!(resolved.resolved_def.types.is_none());
}

#[test]
fn test_named_import_overrides_glob() {
    let a = ModuleItems::new().item(Item::function("x").public());
    let b = ModuleItems::new().item(Item::function("x").public());

    check(
        ModuleItems::new()
            .use_glob("a")
            .use_path("b::x")
            .item(Item::module("a", a.clone()))
            .item(Item::module("b", b.clone())),
        expect![[r#"
            crate
            a: t
            b: t
            x: v=crate::b::x

            crate::a
            x: v

            crate::b
            x: v

        "#]],
    );

    // Declaration order does not matter.
    check(
        ModuleItems::new()
            .use_path("b::x")
            .use_glob("a")
            .item(Item::module("a", a))
            .item(Item::module("b", b)),
        expect![[r#"
            crate
            a: t
            b: t
            x: v=crate::b::x

            crate::a
            x: v

            crate::b
            x: v

        "#]],
    );
}

#[test]
fn test_declared_item_shadows_glob() {
    check(
        ModuleItems::new()
            .use_glob("a")
            .item(Item::function("x"))
            .item(Item::module("a", ModuleItems::new().item(Item::function("x").public()).item(Item::function("y").public()))),
        expect![[r#"
            crate
            a: t
            x: v
            y: v=crate::a::y

            crate::a
            x: v
            y: v

        "#]],
    );
}

#[test]
fn test_glob_fills_only_free_namespaces() {
    // `S` is a type here; the glob still brings in the value `S` from `a`.
    let def_map = crate_def_map(
        ModuleItems::new()
            .use_glob("a")
            .item(Item::struct_def("S", FieldShape::Record))
            .item(Item::module(
                "a",
                ModuleItems::new().item(Item::constant("S").public()).item(Item::trait_def("T").public()),
            )),
    );

    expect![[r#"
        crate
        S: t v=crate::a::S
        T: t=crate::a::T
        a: t

        crate::a
        S: v
        T: t

    "#]]
    .assert_eq(&def_map.dump());
}

#[test]
fn test_glob_respects_visibility() {
    let def_map = crate_def_map(
        ModuleItems::new()
            .item(Item::module(
                "n",
                ModuleItems::new()
                    .item(Item::function("hidden"))
                    .item(Item::function("shown").public())
                    .item(Item::function("in_crate").with_visibility("pub(crate)".parse().unwrap()))
                    .item(Item::module("inner", ModuleItems::new().use_glob("super"))),
            ))
            .item(Item::module("m", ModuleItems::new().use_glob("super::n"))),
    );

    expect![[r#"
        crate
        m: t
        n: t

        crate::m
        in_crate: v=crate::n::in_crate
        shown: v=crate::n::shown

        crate::n
        hidden: v
        in_crate: v
        inner: t
        shown: v

        crate::n::inner
        hidden: v=crate::n::hidden
        in_crate: v=crate::n::in_crate
        inner: t=crate::n::inner
        shown: v=crate::n::shown

    "#]]
    .assert_eq(&def_map.dump());

    let m = def_map.module_by_text("m").unwrap();
    assert!(def_map.get(m, "hidden").is_none());
}

#[test]
fn test_glob_propagates_late_names_to_every_importer() {
    let def_map = crate_def_map(
        ModuleItems::new()
            .item(Item::module("p", ModuleItems::new().use_glob("crate::r")))
            .item(Item::module("q", ModuleItems::new().use_glob("crate::r")))
            .item(Item::module("r", ModuleItems::new().use_item(UseItem::new("crate::t::z").public())))
            .item(Item::module("t", ModuleItems::new().use_item(UseItem::new("crate::u::z").public())))
            .item(Item::module("u", ModuleItems::new().item(Item::function("z").public()))),
    );

    expect![[r#"
        crate
        p: t
        q: t
        r: t
        t: t
        u: t

        crate::p
        z: v=crate::u::z

        crate::q
        z: v=crate::u::z

        crate::r
        z: v=crate::u::z

        crate::t
        z: v=crate::u::z

        crate::u
        z: v

    "#]]
    .assert_eq(&def_map.dump());

    // Each importer holds `z` under its own (private) glob visibility.
    for importer in ["p", "q"] {
        let module = def_map.module_by_text(importer).unwrap();
        let z = def_map.get(module, "z").and_then(|def| def.values.clone()).unwrap();
        assert!(!z.visibility.is_public());
        assert!(z.visibility.is_visible_from(&def_map, module));
        assert!(!z.visibility.is_visible_from(&def_map, def_map.root()));
    }
    assert!(def_map.diagnostics().is_empty());
}

#[test]
fn test_public_glob_reexports_through_chain() {
    check(
        ModuleItems::new()
            .use_glob("a")
            .item(Item::module("a", ModuleItems::new().use_item(UseItem::new("super::b").glob().public())))
            .item(Item::module("b", ModuleItems::new().use_item(UseItem::new("super::c").glob().public())))
            .item(Item::module("c", ModuleItems::new().item(Item::function("deep").public()))),
        expect![[r#"
            crate
            a: t
            b: t
            c: t
            deep: v=crate::c::deep

            crate::a
            deep: v=crate::c::deep

            crate::b
            deep: v=crate::c::deep

            crate::c
            deep: v

        "#]],
    );
}

#[test]
fn test_cyclic_globs_terminate() {
    check(
        ModuleItems::new()
            .item(Item::module(
                "a",
                ModuleItems::new().use_item(UseItem::new("super::b").glob().public()).item(Item::function("fa").public()),
            ))
            .item(Item::module(
                "b",
                ModuleItems::new().use_item(UseItem::new("super::a").glob().public()).item(Item::function("fb").public()),
            )),
        expect![[r#"
            crate
            a: t
            b: t

            crate::a
            fa: v
            fb: v=crate::b::fb

            crate::b
            fa: v=crate::a::fa
            fb: v

        "#]],
    );
}

#[test]
fn test_self_glob_changes_nothing() {
    check(
        ModuleItems::new().item(Item::module(
            "a",
            ModuleItems::new().use_item(UseItem::new("self").glob().public()).item(Item::function("f").public()),
        )),
        expect![[r#"
            crate
            a: t

            crate::a
            f: v

        "#]],
    );
}

#[test]
fn test_glob_of_enum_imports_variants() {
    let def_map = crate_def_map(
        ModuleItems::new().use_glob("E").item(Item::enum_def(
            "E",
            vec![Variant::unit("A"), Variant::new("B", FieldShape::Tuple), Variant::new("C", FieldShape::Record)],
        )),
    );

    expect![[r#"
        crate
        A: t=crate::E::A v=crate::E::A
        B: t=crate::E::B v=crate::E::B
        C: t=crate::E::C
        E: t

        crate::E
        A: t v
        B: t v
        C: t

    "#]]
    .assert_eq(&def_map.dump());

    let c = def_map.resolve_path_str(def_map.root(), "C", ResolveMode::Other).resolved_def;
    assert!(c.get(Namespace::Values).is_none());
}

#[test]
fn test_glob_of_non_module_is_ignored() {
    let def_map = crate_def_map(
        ModuleItems::new().use_glob("f").item(Item::function("f")).item(Item::trait_def("Tr")).use_glob("Tr"),
    );

    expect![[r#"
        crate
        Tr: t
        f: v

    "#]]
    .assert_eq(&def_map.dump());
}

#[test]
fn test_glob_chain_deeper_than_limit_fails() {
    init_logger();
    let mut graph = CrateGraph::new();
    let krate = graph
        .add_crate(CrateData::new(
            "deep",
            ModuleItems::new()
                .use_glob("a")
                .item(Item::module("a", ModuleItems::new().use_item(UseItem::new("super::b").glob().public())))
                .item(Item::module("b", ModuleItems::new().item(Item::function("f").public()))),
        ))
        .unwrap();
    let config = ResolveConfig { glob_recursion_limit: 0, ..ResolveConfig::default() };
    let mut db = DefDatabase::new(graph, config);

    let err = db.build_crate(krate).unwrap_err();
    assert!(matches!(err, DefMapError::GlobRecursionLimit { limit: 0, .. }));
    assert!(db.crate_def_map(krate).is_none());
}
