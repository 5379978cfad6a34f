//! Lowering tests on symbolic instruction streams.

use crate::CompileOptions;
use crate::ast::{
    AssignOp, BinaryOp, Expr, Stmt, StmtKind, SwitchArm, TranslationUnit, Type, UnaryOp,
};
use crate::test_utils::{assign, func, func_with, global, lowered, main_only};

fn id(name: &str) -> Expr {
    Expr::ident(name)
}

fn int(v: i64) -> Expr {
    Expr::int(v)
}

fn bin(op: BinaryOp, lhs: Expr, rhs: Expr) -> Expr {
    Expr::binary(op, lhs, rhs)
}

fn int_local(name: &str) -> Stmt {
    Stmt::decl(name, Type::Int, None)
}

fn float_local(name: &str) -> Stmt {
    Stmt::decl(name, Type::Float, None)
}

fn main_listing(body: Vec<Stmt>) -> Vec<String> {
    lowered(&main_only(body), "main", &CompileOptions::default())
}

fn autocast_listing(body: Vec<Stmt>) -> Vec<String> {
    let options = CompileOptions {
        autocast: true,
        ..CompileOptions::default()
    };
    lowered(&main_only(body), "main", &options)
}

/// Listing without the `begin`/`end` frame.
fn body(listing: Vec<String>) -> Vec<String> {
    listing[1..listing.len() - 1].to_vec()
}

#[test]
fn global_assignment_and_return() {
    let unit = TranslationUnit::new(vec![
        global("x", Type::Int),
        func(
            "main",
            Type::Int,
            vec![
                assign("x", bin(BinaryOp::Add, int(1), int(2))),
                Stmt::ret(Some(id("x"))),
            ],
        ),
    ]);

    assert_eq!(
        lowered(&unit, "main", &CompileOptions::default()),
        [
            "begin 0x0, 0x0",
            "-> pushShort 0x1",
            "-> pushShort 0x2",
            "-> addi",
            "setVar 0x1, 0x0",
            "-> pushVar 0x1, 0x0",
            "return_6",
            "end",
        ]
    );
}

#[test]
fn prologue_counts_params_and_locals() {
    let unit = TranslationUnit::new(vec![func_with(
        "f",
        Type::Void,
        &[("a", Type::Int), ("b", Type::Float)],
        vec![
            int_local("c"),
            Stmt::decl("a", Type::Int, Some(int(3))),
            Stmt::ret(None),
        ],
    )]);

    assert_eq!(
        lowered(&unit, "f", &CompileOptions::default()),
        [
            "begin 0x2, 0x3",
            "-> pushShort 0x3",
            "setVar 0x0, 0x0",
            "return_7",
            "end",
        ]
    );
}

#[test]
fn locals_shadow_globals() {
    let unit = TranslationUnit::new(vec![
        global("g", Type::Int),
        global("x", Type::Int),
        func(
            "main",
            Type::Int,
            vec![int_local("x"), assign("x", id("g"))],
        ),
    ]);

    assert_eq!(
        body(lowered(&unit, "main", &CompileOptions::default())),
        ["-> pushVar 0x1, 0x0", "setVar 0x0, 0x0"]
    );
}

#[test]
fn if_else() {
    let listing = main_listing(vec![
        int_local("a"),
        int_local("b"),
        Stmt::if_else(
            id("a"),
            Stmt::block(vec![assign("b", int(1))]),
            Some(Stmt::block(vec![assign("b", int(2))])),
        ),
    ]);

    assert_eq!(
        body(listing),
        [
            "-> pushVar 0x0, 0x0",
            "if L0",
            "-> pushShort 0x1",
            "setVar 0x0, 0x1",
            "else L1",
            "L0:",
            "-> pushShort 0x2",
            "setVar 0x0, 0x1",
            "L1:",
        ]
    );
}

#[test]
fn if_not_folds_negation() {
    let listing = main_listing(vec![
        int_local("a"),
        Stmt::if_else(
            Expr::unary(UnaryOp::Not, id("a")),
            assign("a", int(1)),
            None,
        ),
    ]);

    assert_eq!(
        body(listing),
        [
            "-> pushVar 0x0, 0x0",
            "ifNot L0",
            "-> pushShort 0x1",
            "setVar 0x0, 0x0",
            "L0:",
        ]
    );
}

#[test]
fn negated_comparison_flips_opcode() {
    let listing = main_listing(vec![
        int_local("a"),
        int_local("b"),
        Stmt::if_else(
            Expr::unary(UnaryOp::Not, bin(BinaryOp::Lt, id("a"), id("b"))),
            Stmt::ret(None),
            None,
        ),
        assign("b", Expr::unary(UnaryOp::Not, bin(BinaryOp::Eq, id("a"), int(1)))),
        assign("b", Expr::unary(UnaryOp::Not, id("a"))),
    ]);

    assert_eq!(
        body(listing),
        [
            "-> pushVar 0x0, 0x0",
            "-> pushVar 0x0, 0x1",
            "-> greaterOrEqual",
            "if L0",
            "return_7",
            "L0:",
            "-> pushVar 0x0, 0x0",
            "-> pushShort 0x1",
            "-> notEquals",
            "setVar 0x0, 0x1",
            "-> pushVar 0x0, 0x0",
            "-> not",
            "setVar 0x0, 0x1",
        ]
    );
}

#[test]
fn negated_float_comparison_keeps_not() {
    let listing = main_listing(vec![
        float_local("f"),
        int_local("b"),
        assign("b", Expr::unary(UnaryOp::Not, bin(BinaryOp::Lt, id("f"), id("f")))),
    ]);

    assert_eq!(
        body(listing),
        [
            "-> pushVar 0x0, 0x0",
            "-> pushVar 0x0, 0x0",
            "-> floatLess",
            "-> not",
            "setVar 0x0, 0x1",
        ]
    );
}

#[test]
fn while_loop_tests_at_bottom() {
    let listing = main_listing(vec![
        int_local("i"),
        Stmt::while_loop(
            bin(BinaryOp::Lt, id("i"), int(10)),
            Stmt::expr(Expr::unary(UnaryOp::PostInc, id("i"))),
        ),
    ]);

    assert_eq!(
        body(listing),
        [
            "else L1",
            "L0:",
            "i++ 0x0, 0x0",
            "L1:",
            "-> pushVar 0x0, 0x0",
            "-> pushShort 0xa",
            "-> lessThan",
            "ifNot L0",
            "L2:",
        ]
    );
}

#[test]
fn do_while_skips_initial_jump() {
    let listing = main_listing(vec![
        int_local("i"),
        Stmt::new(StmtKind::DoWhile {
            body: Box::new(Stmt::new(StmtKind::Break)),
            cond: id("i"),
        }),
    ]);

    assert_eq!(
        body(listing),
        ["L0:", "jump L2", "L1:", "-> pushVar 0x0, 0x0", "ifNot L0", "L2:"]
    );
}

#[test]
fn for_loop_with_break_and_continue() {
    let listing = main_listing(vec![Stmt::new(StmtKind::For {
        init: vec![Stmt::decl("i", Type::Int, Some(int(0)))],
        cond: Some(bin(BinaryOp::Lt, id("i"), int(3))),
        step: Some(Expr::unary(UnaryOp::PostInc, id("i"))),
        body: Box::new(Stmt::block(vec![
            Stmt::if_else(
                bin(BinaryOp::Eq, id("i"), int(1)),
                Stmt::new(StmtKind::Continue),
                None,
            ),
            Stmt::new(StmtKind::Break),
        ])),
    })]);

    assert_eq!(
        body(listing),
        [
            "-> pushShort 0x0",
            "setVar 0x0, 0x0",
            "else L2",
            "L0:",
            "-> pushVar 0x0, 0x0",
            "-> pushShort 0x1",
            "-> equals",
            "if L4",
            "jump L1",
            "L4:",
            "jump L3",
            "L1:",
            "i++ 0x0, 0x0",
            "L2:",
            "-> pushVar 0x0, 0x0",
            "-> pushShort 0x3",
            "-> lessThan",
            "ifNot L0",
            "L3:",
        ]
    );
}

#[test]
fn for_without_condition_loops_unconditionally() {
    let listing = main_listing(vec![Stmt::new(StmtKind::For {
        init: vec![],
        cond: None,
        step: None,
        body: Box::new(Stmt::new(StmtKind::Break)),
    })]);

    assert_eq!(
        body(listing),
        ["else L2", "L0:", "jump L3", "L1:", "L2:", "else L0", "L3:"]
    );
}

#[test]
fn break_outside_loop_is_unbound() {
    let listing = main_listing(vec![Stmt::new(StmtKind::Break)]);
    assert_eq!(body(listing), ["jump ?"]);
}

#[test]
fn switch_chain() {
    let listing = main_listing(vec![
        int_local("s"),
        int_local("r"),
        Stmt::new(StmtKind::Switch {
            discriminant: id("s"),
            arms: vec![
                SwitchArm::Default {
                    body: vec![assign("r", int(0))],
                },
                SwitchArm::Case {
                    value: int(1),
                    body: vec![assign("r", int(10)), Stmt::new(StmtKind::Break)],
                },
                SwitchArm::Case {
                    value: int(2),
                    body: vec![assign("r", int(20))],
                },
            ],
        }),
    ]);

    assert_eq!(
        body(listing),
        [
            "-> pushShort 0x1",
            "-> pushVar 0x0, 0x0",
            "-> equals",
            "if L1",
            "-> pushShort 0xa",
            "setVar 0x0, 0x1",
            "jump L0",
            "L1:",
            "-> pushShort 0x2",
            "-> pushVar 0x0, 0x0",
            "-> equals",
            "if L2",
            "-> pushShort 0x14",
            "setVar 0x0, 0x1",
            "L2:",
            "-> pushShort 0x0",
            "setVar 0x0, 0x1",
            "L0:",
        ]
    );
}

#[test]
fn continue_inside_switch_targets_loop() {
    let listing = main_listing(vec![
        int_local("s"),
        Stmt::while_loop(
            id("s"),
            Stmt::new(StmtKind::Switch {
                discriminant: id("s"),
                arms: vec![SwitchArm::Default {
                    body: vec![Stmt::new(StmtKind::Continue)],
                }],
            }),
        ),
    ]);

    assert_eq!(
        body(listing),
        [
            "else L1",
            "L0:",
            "jump L1",
            "L3:",
            "L1:",
            "-> pushVar 0x0, 0x0",
            "ifNot L0",
            "L2:",
        ]
    );
}

#[test]
fn logical_and_or() {
    let listing = main_listing(vec![
        int_local("a"),
        int_local("b"),
        assign("a", bin(BinaryOp::And, id("a"), id("b"))),
        assign("a", bin(BinaryOp::Or, id("a"), id("b"))),
    ]);

    assert_eq!(
        body(listing),
        [
            "-> pushVar 0x0, 0x0",
            "if L0",
            "-> pushVar 0x0, 0x1",
            "if L0",
            "-> pushShort 0x1",
            "else L1",
            "L0:",
            "-> pushShort 0x0",
            "L1:",
            "setVar 0x0, 0x0",
            "-> pushVar 0x0, 0x0",
            "ifNot L2",
            "-> pushVar 0x0, 0x1",
            "if L3",
            "L2:",
            "-> pushShort 0x1",
            "else L4",
            "L3:",
            "-> pushShort 0x0",
            "L4:",
            "setVar 0x0, 0x0",
        ]
    );
}

#[test]
fn ternary_and_fused_ternary() {
    let listing = main_listing(vec![
        int_local("a"),
        int_local("b"),
        assign("a", Expr::ternary(id("a"), int(5), id("b"))),
        assign(
            "a",
            Expr::ternary(id("a"), Expr::ternary(id("b"), int(1), int(0)), int(0)),
        ),
    ]);

    assert_eq!(
        body(listing),
        [
            "-> pushVar 0x0, 0x0",
            "if L0",
            "-> pushShort 0x5",
            "else L1",
            "L0:",
            "-> pushVar 0x0, 0x1",
            "L1:",
            "setVar 0x0, 0x0",
            "-> pushVar 0x0, 0x0",
            "if L2",
            "-> pushVar 0x0, 0x1",
            "if L2",
            "-> pushShort 0x1",
            "else L3",
            "L2:",
            "-> pushShort 0x0",
            "L3:",
            "setVar 0x0, 0x0",
        ]
    );
}

#[test]
fn user_calls_are_guarded() {
    let unit = TranslationUnit::new(vec![
        func(
            "main",
            Type::Int,
            vec![
                int_local("r"),
                Stmt::expr(Expr::call("helper", vec![int(1), int(2)])),
                assign("r", Expr::call("helper", vec![])),
            ],
        ),
        func_with(
            "helper",
            Type::Int,
            &[("a", Type::Int), ("b", Type::Int)],
            vec![Stmt::ret(Some(id("a")))],
        ),
    ]);

    assert_eq!(
        body(lowered(&unit, "main", &CompileOptions::default())),
        [
            "try L0",
            "-> pushShort 0x1",
            "-> pushShort 0x2",
            "-> pushInt helper",
            "callFunc 0x2",
            "L0:",
            "-> try L1",
            "-> pushInt helper",
            "callFunc 0x0",
            "L1:",
            "setVar 0x0, 0x0",
        ]
    );
}

#[test]
fn pointer_call() {
    let listing = main_listing(vec![
        int_local("p"),
        Stmt::expr(Expr::call_ptr(id("p"), vec![int(7)])),
    ]);

    assert_eq!(
        body(listing),
        [
            "try L0",
            "-> pushShort 0x7",
            "-> pushVar 0x0, 0x0",
            "callFunc 0x1",
            "L0:",
        ]
    );
}

#[test]
fn intrinsics_and_syscalls() {
    let unit = TranslationUnit::new(vec![
        func(
            "main",
            Type::Int,
            vec![
                Stmt::expr(Expr::call("printf", vec![Expr::string("n=%d"), int(3)])),
                Stmt::expr(Expr::call("set_main", vec![id("helper"), int(5)])),
                Stmt::expr(Expr::call("callFunc3", vec![id("helper")])),
                Stmt::expr(Expr::call("sys_2D", vec![int(1)])),
            ],
        ),
        func("helper", Type::Void, vec![]),
    ]);

    assert_eq!(
        body(lowered(&unit, "main", &CompileOptions::default())),
        [
            "-> pushShort 0x0",
            "-> pushShort 0x3",
            "printf 0x2",
            "-> pushShort 0x5",
            "-> pushInt helper",
            "callFunc2 0x1",
            "-> pushInt helper",
            "callFunc3 0x0",
            "-> pushShort 0x1",
            "sys 0x1, 0x2d",
        ]
    );
}

#[test]
fn literals_and_constants() {
    let listing = main_listing(vec![
        int_local("r"),
        assign("r", int(0xFFFF)),
        assign("r", int(0x10000)),
        assign("r", int(-5)),
        assign("r", Expr::unary(UnaryOp::Neg, int(5))),
        assign("r", Expr::float(1.5)),
        assign("r", Expr::unary(UnaryOp::Neg, Expr::float(1.0))),
        assign("r", id("true")),
        assign("r", id("NULL_FUNC_PTR")),
        assign("r", id("M_PI")),
        assign("r", Expr::unary(UnaryOp::SizeOf, id("r"))),
    ]);

    let values: Vec<&str> = listing
        .iter()
        .map(String::as_str)
        .filter(|l| l.starts_with("->"))
        .collect();
    assert_eq!(
        values,
        [
            "-> pushShort 0xffff",
            "-> pushInt 0x10000",
            "-> pushInt 0xfffffffb",
            "-> pushInt 0xfffffffb",
            "-> pushInt 0x3fc00000",
            "-> pushInt 0xbf800000",
            "-> pushInt 0x1",
            "-> pushInt 0xffffffff",
            "-> pushInt 0x40490fdb",
            "-> pushShort 0x4",
        ]
    );
}

#[test]
fn push_int_mode() {
    let options = CompileOptions {
        short_literals: false,
        ..CompileOptions::default()
    };
    let unit = main_only(vec![Stmt::ret(Some(int(1)))]);
    assert_eq!(body(lowered(&unit, "main", &options)), ["-> pushInt 0x1", "return_6"]);
}

#[test]
fn strings_are_deduplicated() {
    let listing = main_listing(vec![
        Stmt::expr(Expr::call("printf", vec![Expr::string("hi")])),
        Stmt::expr(Expr::call("printf", vec![Expr::string("other")])),
        Stmt::expr(Expr::call("printf", vec![Expr::string("hi")])),
    ]);

    assert_eq!(
        body(listing),
        [
            "-> pushShort 0x0",
            "printf 0x1",
            "-> pushShort 0x1",
            "printf 0x1",
            "-> pushShort 0x0",
            "printf 0x1",
        ]
    );
}

#[test]
fn unary_operators() {
    let unit = TranslationUnit::new(vec![
        func(
            "main",
            Type::Int,
            vec![
                int_local("a"),
                float_local("f"),
                assign("a", Expr::unary(UnaryOp::BitNot, id("a"))),
                assign("a", Expr::unary(UnaryOp::Neg, id("a"))),
                assign("f", Expr::unary(UnaryOp::Neg, id("f"))),
                assign("a", Expr::unary(UnaryOp::PreDec, id("a"))),
                Stmt::expr(Expr::unary(UnaryOp::PostInc, id("f"))),
                assign("a", Expr::unary(UnaryOp::AddressOf, id("main"))),
            ],
        ),
    ]);

    assert_eq!(
        body(lowered(&unit, "main", &CompileOptions::default())),
        [
            "-> pushVar 0x0, 0x0",
            "-> bitNot",
            "setVar 0x0, 0x0",
            "-> pushVar 0x0, 0x0",
            "-> negi",
            "setVar 0x0, 0x0",
            "-> pushVar 0x0, 0x1",
            "-> negf",
            "floatVarSet 0x0, 0x1",
            "-> i-- 0x0, 0x0",
            "setVar 0x0, 0x0",
            "f++ 0x0, 0x1",
            "-> pushInt main",
            "setVar 0x0, 0x0",
        ]
    );
}

#[test]
fn compound_assignment_by_type() {
    let listing = main_listing(vec![
        int_local("a"),
        float_local("f"),
        Stmt::expr(Expr::assign(AssignOp::Add, id("a"), int(1))),
        Stmt::expr(Expr::assign(AssignOp::Add, id("f"), int(1))),
        Stmt::expr(Expr::assign(AssignOp::Div, id("f"), int(2))),
        Stmt::expr(Expr::assign(AssignOp::Mod, id("f"), int(2))),
        Stmt::expr(Expr::assign(AssignOp::Xor, id("a"), int(3))),
    ]);

    let stores: Vec<&str> = listing
        .iter()
        .map(String::as_str)
        .filter(|l| !l.starts_with("->"))
        .collect();
    assert_eq!(
        stores,
        [
            "begin 0x0, 0x2",
            "i+= 0x0, 0x0",
            "float+= 0x0, 0x1",
            "float/= 0x0, 0x1",
            "i%= 0x0, 0x1",
            "i^= 0x0, 0x0",
            "end",
        ]
    );
}

#[test]
fn float_arithmetic_without_autocast() {
    let listing = main_listing(vec![
        float_local("f"),
        int_local("i"),
        assign("f", bin(BinaryOp::Add, id("i"), Expr::float(1.5))),
        assign("i", id("f")),
        assign("i", bin(BinaryOp::Mod, id("i"), id("f"))),
    ]);

    assert_eq!(
        body(listing),
        [
            "-> pushVar 0x0, 0x1",
            "-> pushInt 0x3fc00000",
            "-> addf",
            "floatVarSet 0x0, 0x0",
            "-> pushVar 0x0, 0x0",
            "setVar 0x0, 0x1",
            "-> pushVar 0x0, 0x1",
            "-> pushVar 0x0, 0x0",
            "-> modi",
            "setVar 0x0, 0x1",
        ]
    );
}

#[test]
fn autocast_converts_operands_and_stores() {
    let listing = autocast_listing(vec![
        float_local("f"),
        int_local("i"),
        assign("f", bin(BinaryOp::Add, id("i"), Expr::float(1.5))),
        assign("f", bin(BinaryOp::Mul, id("f"), id("i"))),
        assign("i", id("f")),
        assign("f", id("i")),
        assign("i", bin(BinaryOp::BitAnd, id("i"), id("f"))),
    ]);

    assert_eq!(
        body(listing),
        [
            "-> pushVar 0x0, 0x1",
            "intToFloat 0x0",
            "-> pushInt 0x3fc00000",
            "-> addf",
            "floatVarSet 0x0, 0x0",
            "-> pushVar 0x0, 0x0",
            "-> pushVar 0x0, 0x1",
            "intToFloat 0x0",
            "-> multf",
            "floatVarSet 0x0, 0x0",
            "-> pushVar 0x0, 0x0",
            "floatToInt 0x0",
            "setVar 0x0, 0x1",
            "-> pushVar 0x0, 0x1",
            "intToFloat 0x0",
            "floatVarSet 0x0, 0x0",
            "-> pushVar 0x0, 0x1",
            "-> pushVar 0x0, 0x0",
            "-> bitAnd",
            "setVar 0x0, 0x1",
        ]
    );
}

#[test]
fn declarations_always_convert() {
    let listing = main_listing(vec![
        Stmt::decl("f", Type::Float, Some(int(2))),
        Stmt::decl("i", Type::Int, Some(Expr::call("sys_8", vec![]))),
        Stmt::decl("j", Type::Int, Some(Expr::call("sys_9", vec![]))),
        Stmt::decl("g", Type::Float, Some(Expr::call("sys_9", vec![]))),
    ]);

    assert_eq!(
        body(listing),
        [
            "-> pushShort 0x2",
            "intToFloat 0x0",
            "setVar 0x0, 0x0",
            "-> sys 0x0, 0x8",
            "floatToInt 0x0",
            "setVar 0x0, 0x1",
            "-> sys 0x0, 0x9",
            "setVar 0x0, 0x2",
            "-> sys 0x0, 0x9",
            "setVar 0x0, 0x3",
        ]
    );
}

#[test]
fn casts() {
    let listing = main_listing(vec![
        float_local("f"),
        int_local("i"),
        assign("i", Expr::cast(Type::Int, id("f"))),
        assign("f", Expr::cast(Type::Float, id("i"))),
        Stmt::expr(Expr::cast(Type::Float, id("i"))),
    ]);

    assert_eq!(
        body(listing),
        [
            "-> pushVar 0x0, 0x0",
            "floatToInt 0x0",
            "setVar 0x0, 0x1",
            "-> pushVar 0x0, 0x1",
            "intToFloat 0x0",
            "floatVarSet 0x0, 0x0",
            "pushVar 0x0, 0x1",
        ]
    );
}

#[test]
fn goto_and_labels() {
    let listing = main_listing(vec![
        int_local("r"),
        Stmt::new(StmtKind::Goto {
            label: "out".into(),
        }),
        assign("r", int(1)),
        Stmt::new(StmtKind::Labeled {
            label: "out".into(),
            body: Box::new(Stmt::ret(Some(int(0)))),
        }),
    ]);

    assert_eq!(
        body(listing),
        [
            "jump out",
            "-> pushShort 0x1",
            "setVar 0x0, 0x0",
            "out:",
            "-> pushShort 0x0",
            "return_6",
        ]
    );
}

#[test]
fn discarded_expressions_leave_nothing_pushed() {
    let listing = main_listing(vec![
        int_local("a"),
        Stmt::expr(id("a")),
        Stmt::expr(bin(BinaryOp::Add, id("a"), int(1))),
    ]);

    assert_eq!(
        body(listing),
        ["pushVar 0x0, 0x0", "-> pushVar 0x0, 0x0", "-> pushShort 0x1", "addi"]
    );
}

#[test]
fn redeclaration_keeps_first_slot_and_type() {
    let listing = main_listing(vec![
        float_local("f"),
        int_local("i"),
        Stmt::decl("f", Type::Int, Some(int(1))),
    ]);

    assert_eq!(
        listing,
        [
            "begin 0x0, 0x2",
            "-> pushShort 0x1",
            "intToFloat 0x0",
            "setVar 0x0, 0x0",
            "end",
        ]
    );
}
