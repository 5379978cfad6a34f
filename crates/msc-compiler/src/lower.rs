//! Node lowering: syntax tree to symbolic instruction streams.
//!
//! Every expression is lowered with an explicit [`Usage`]. The instruction
//! that produces an expression's value carries the push flag exactly when the
//! value is consumed, so the operand stack stays balanced without any
//! after-the-fact search for the producing instruction.
//!
//! Value types are structural: the lowering of each expression reports
//! whether it left an int, a float, or a syscall result of unknown type.

use msc_bytecode::Opcode;

use crate::ast::{
    AssignOp, BinaryOp, Callee, Coord, Expr, ExprKind, Stmt, StmtKind, SwitchArm, Type, UnaryOp,
};
use crate::context::{CompilationContext, Locals, ValueType, Variable, constant};
use crate::error::CompileError;
use crate::escape::decode_escapes;
use crate::ir::{Emit, InstructionIR, Label, Operand};
use crate::syscalls::returns_float;

type Result<T> = std::result::Result<T, CompileError>;

/// Whether the enclosing construct consumes an expression's value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Usage {
    Value,
    Discard,
}

impl Usage {
    fn push(self) -> bool {
        self == Usage::Value
    }
}

/// Jump targets for `break` and `continue`.
#[derive(Clone, Copy, Debug)]
struct LoopTargets {
    brk: Label,
    /// `None` inside a `switch` that is not nested in a loop.
    cont: Option<Label>,
}

/// Lowers the body of one function.
pub struct Lowerer<'c, 'a> {
    ctx: &'c mut CompilationContext<'a>,
    locals: Locals,
    out: Vec<Emit>,
    loops: Vec<LoopTargets>,
}

impl<'c, 'a> Lowerer<'c, 'a> {
    pub fn new(ctx: &'c mut CompilationContext<'a>, locals: Locals) -> Self {
        Self {
            ctx,
            locals,
            out: Vec::new(),
            loops: Vec::new(),
        }
    }

    pub fn finish(self) -> (Vec<Emit>, Locals) {
        (self.out, self.locals)
    }

    fn emit(&mut self, instr: InstructionIR) {
        self.out.push(Emit::Instr(instr));
    }

    fn op(&mut self, opcode: Opcode, values: &[u32], push: bool) {
        self.emit(InstructionIR::values(opcode, values).with_push(push));
    }

    fn jump(&mut self, opcode: Opcode, target: impl Into<Operand>) {
        self.emit(InstructionIR::new(opcode, vec![target.into()]));
    }

    fn place(&mut self, label: Label) {
        self.out.push(Emit::Label(label));
    }

    fn fresh(&mut self) -> Label {
        self.ctx.fresh_label()
    }

    fn last_instr_mut(&mut self) -> Option<&mut InstructionIR> {
        match self.out.last_mut() {
            Some(Emit::Instr(i)) => Some(i),
            _ => None,
        }
    }

    fn lookup(&self, name: &str) -> Option<Variable> {
        self.locals.get(name).or_else(|| self.ctx.global(name))
    }

    fn lvalue(&self, target: &Expr) -> Result<Variable> {
        target
            .as_ident()
            .and_then(|name| self.lookup(name))
            .ok_or(CompileError::InvalidLvalue {
                coord: target.coord,
            })
    }

    /// Integer literal, short form when enabled and the value fits.
    fn literal(&mut self, value: u32, usage: Usage) {
        let opcode = if self.ctx.options.short_literals && value <= 0xFFFF {
            Opcode::PushShort
        } else {
            Opcode::PushInt
        };
        self.op(opcode, &[value], usage.push());
    }

    /// Push a function's address, resolved later.
    fn push_symbol(&mut self, name: &str, push: bool) {
        let instr = InstructionIR::new(Opcode::PushInt, vec![Operand::Symbol(name.to_string())]);
        self.emit(instr.with_push(push));
    }

    /// Convert a value of type `from` so it can be stored as `to`.
    fn convert(&mut self, to: ValueType, from: ValueType) {
        let opcode = match (to, from) {
            (ValueType::Float, ValueType::Int) => Opcode::IntToFloat,
            (ValueType::Int, ValueType::Float) => Opcode::FloatToInt,
            _ => return,
        };
        self.op(opcode, &[0], false);
    }

    fn with_targets(
        &mut self,
        targets: LoopTargets,
        f: impl FnOnce(&mut Self) -> Result<()>,
    ) -> Result<()> {
        self.loops.push(targets);
        let result = f(self);
        self.loops.pop();
        result
    }

    pub fn stmts(&mut self, stmts: &[Stmt]) -> Result<()> {
        for stmt in stmts {
            self.stmt(stmt)?;
        }
        Ok(())
    }

    pub fn stmt(&mut self, stmt: &Stmt) -> Result<()> {
        match &stmt.kind {
            StmtKind::Decl { name, ty, init } => self.decl(name, *ty, init.as_ref()),
            StmtKind::Expr { expr } => self.expr(expr, Usage::Discard).map(drop),
            StmtKind::Block { body } => self.stmts(body),
            StmtKind::If {
                cond,
                then,
                otherwise,
            } => self.if_stmt(cond, then, otherwise.as_deref()),
            StmtKind::While { cond, body } => self.while_loop(cond, body, true),
            StmtKind::DoWhile { body, cond } => self.while_loop(cond, body, false),
            StmtKind::For {
                init,
                cond,
                step,
                body,
            } => self.for_loop(init, cond.as_ref(), step.as_ref(), body),
            StmtKind::Break => {
                let target = self.loops.last().map(|l| l.brk);
                self.loop_jump(target, stmt.coord);
                Ok(())
            }
            StmtKind::Continue => {
                let target = self.loops.last().and_then(|l| l.cont);
                self.loop_jump(target, stmt.coord);
                Ok(())
            }
            StmtKind::Return { value: None } => {
                self.op(Opcode::Return7, &[], false);
                Ok(())
            }
            StmtKind::Return { value: Some(value) } => {
                self.expr(value, Usage::Value)?;
                self.op(Opcode::Return6, &[], false);
                Ok(())
            }
            StmtKind::Switch { discriminant, arms } => self.switch(discriminant, arms, stmt.coord),
            StmtKind::Goto { label } => {
                self.jump(Opcode::Jump, Operand::Symbol(label.clone()));
                Ok(())
            }
            StmtKind::Labeled { label, body } => {
                self.out.push(Emit::Named(label.clone()));
                self.stmt(body)
            }
            StmtKind::Empty => Ok(()),
        }
    }

    fn loop_jump(&mut self, target: Option<Label>, coord: Coord) {
        let operand = target.map_or(Operand::Unbound(coord), Operand::Label);
        self.jump(Opcode::Jump, operand);
    }

    fn decl(&mut self, name: &str, ty: Type, init: Option<&Expr>) -> Result<()> {
        let var = self.locals.declare(name, ty);
        let Some(init) = init else {
            return Ok(());
        };
        let value = self.expr(init, Usage::Value)?;
        self.convert(var.ty.into(), value);
        self.op(Opcode::SetVar, &var.params(), false);
        Ok(())
    }

    fn if_stmt(&mut self, cond: &Expr, then: &Stmt, otherwise: Option<&Stmt>) -> Result<()> {
        let branch = self.condition(cond)?;
        let skip = self.fresh();
        self.jump(branch, skip);
        self.stmt(then)?;

        let Some(otherwise) = otherwise else {
            self.place(skip);
            return Ok(());
        };
        let end = self.fresh();
        self.jump(Opcode::Else, end);
        self.place(skip);
        self.stmt(otherwise)?;
        self.place(end);
        Ok(())
    }

    /// Lower a branch condition. A trailing `not` of a negated condition is
    /// dropped and the branch polarity flipped instead.
    fn condition(&mut self, cond: &Expr) -> Result<Opcode> {
        self.expr(cond, Usage::Value)?;
        let negated = matches!(cond.kind, ExprKind::Unary { op: UnaryOp::Not, .. });
        if negated && matches!(self.out.last(), Some(Emit::Instr(i)) if i.opcode == Opcode::Not) {
            self.out.pop();
            return Ok(Opcode::IfNot);
        }
        Ok(Opcode::If)
    }

    /// Bottom-tested loop; `while` jumps to the test first, `do`/`while` does not.
    fn while_loop(&mut self, cond: &Expr, body: &Stmt, test_first: bool) -> Result<()> {
        let top = self.fresh();
        let test = self.fresh();
        let end = self.fresh();

        if test_first {
            self.jump(Opcode::Else, test);
        }
        self.place(top);
        let targets = LoopTargets {
            brk: end,
            cont: Some(test),
        };
        self.with_targets(targets, |this| this.stmt(body))?;
        self.place(test);
        self.expr(cond, Usage::Value)?;
        self.jump(Opcode::IfNot, top);
        self.place(end);
        Ok(())
    }

    fn for_loop(
        &mut self,
        init: &[Stmt],
        cond: Option<&Expr>,
        step: Option<&Expr>,
        body: &Stmt,
    ) -> Result<()> {
        self.stmts(init)?;

        let top = self.fresh();
        let next = self.fresh();
        let test = self.fresh();
        let end = self.fresh();

        self.jump(Opcode::Else, test);
        self.place(top);
        let targets = LoopTargets {
            brk: end,
            cont: Some(next),
        };
        self.with_targets(targets, |this| this.stmt(body))?;
        self.place(next);
        if let Some(step) = step {
            self.expr(step, Usage::Discard)?;
        }
        self.place(test);
        match cond {
            Some(cond) => {
                self.expr(cond, Usage::Value)?;
                self.jump(Opcode::IfNot, top);
            }
            None => self.jump(Opcode::Else, top),
        }
        self.place(end);
        Ok(())
    }

    /// Linear chain of equality tests; default bodies follow the chain.
    fn switch(&mut self, discriminant: &Expr, arms: &[SwitchArm], coord: Coord) -> Result<()> {
        if discriminant.as_ident().is_none() {
            return Err(CompileError::InvalidSwitch { coord });
        }
        let end = self.fresh();
        let targets = LoopTargets {
            brk: end,
            cont: self.loops.last().and_then(|l| l.cont),
        };

        self.with_targets(targets, |this| {
            for arm in arms {
                let SwitchArm::Case { value, body } = arm else {
                    continue;
                };
                let next = this.fresh();
                this.expr(value, Usage::Value)?;
                this.expr(discriminant, Usage::Value)?;
                this.op(Opcode::Equals, &[], true);
                this.jump(Opcode::If, next);
                this.stmts(body)?;
                this.place(next);
            }
            for arm in arms {
                if let SwitchArm::Default { body } = arm {
                    this.stmts(body)?;
                }
            }
            Ok(())
        })?;
        self.place(end);
        Ok(())
    }

    pub fn expr(&mut self, e: &Expr, usage: Usage) -> Result<ValueType> {
        let coord = e.coord;
        match &e.kind {
            ExprKind::Int { value } => {
                self.literal(*value as u32, usage);
                Ok(ValueType::Int)
            }
            ExprKind::Float { value } => {
                self.op(Opcode::PushInt, &[(*value as f32).to_bits()], usage.push());
                Ok(ValueType::Float)
            }
            ExprKind::Str { value } => {
                let decoded = decode_escapes(value)
                    .map_err(|error| CompileError::InvalidEscape { error, coord })?;
                let index = self.ctx.strings.intern(&decoded);
                self.op(Opcode::PushShort, &[index], usage.push());
                Ok(ValueType::Int)
            }
            ExprKind::Ident { name } => self.ident(name, usage, coord),
            ExprKind::Assign { op, target, value } => self.assign(*op, target, value, usage),
            ExprKind::Unary { op, operand } => self.unary(*op, operand, usage, coord),
            ExprKind::Binary { op, lhs, rhs } => self.binary(*op, lhs, rhs, usage),
            ExprKind::Ternary {
                cond,
                then,
                otherwise,
            } => self.ternary(cond, then, otherwise, usage),
            ExprKind::Cast { ty, operand } => self.cast(*ty, operand, usage),
            ExprKind::Call { callee, args } => self.call(callee, args, usage, coord),
        }
    }

    /// Variable, then built-in constant, then function address.
    fn ident(&mut self, name: &str, usage: Usage, coord: Coord) -> Result<ValueType> {
        if let Some(var) = self.lookup(name) {
            self.op(Opcode::PushVar, &var.params(), usage.push());
            return Ok(var.ty.into());
        }
        if let Some((value, ty)) = constant(name) {
            self.op(Opcode::PushInt, &[value], usage.push());
            return Ok(ty);
        }
        if self.ctx.function(name).is_some() {
            self.push_symbol(name, usage.push());
            return Ok(ValueType::Int);
        }
        Err(CompileError::InvalidReference {
            name: name.to_string(),
            coord,
        })
    }

    fn assign(
        &mut self,
        op: AssignOp,
        target: &Expr,
        value: &Expr,
        usage: Usage,
    ) -> Result<ValueType> {
        let var = self.lvalue(target)?;
        let value = self.expr(value, Usage::Value)?;
        if self.ctx.options.autocast {
            self.convert(var.ty.into(), value);
        }
        self.op(store_opcode(op, var.ty.is_float()), &var.params(), usage.push());
        Ok(var.ty.into())
    }

    fn unary(&mut self, op: UnaryOp, operand: &Expr, usage: Usage, coord: Coord) -> Result<ValueType> {
        match op {
            UnaryOp::Not => self.not(operand, usage),
            UnaryOp::BitNot => {
                self.expr(operand, Usage::Value)?;
                self.op(Opcode::BitNot, &[], usage.push());
                Ok(ValueType::Int)
            }
            UnaryOp::Neg => self.negate(operand, usage),
            UnaryOp::PreInc | UnaryOp::PostInc => self.step(operand, true, usage),
            UnaryOp::PreDec | UnaryOp::PostDec => self.step(operand, false, usage),
            UnaryOp::AddressOf => match operand.as_ident() {
                Some(name) if self.ctx.function(name).is_some() => {
                    self.push_symbol(name, usage.push());
                    Ok(ValueType::Int)
                }
                Some(name) => Err(CompileError::InvalidReference {
                    name: name.to_string(),
                    coord: operand.coord,
                }),
                None => Err(CompileError::UnsupportedOperator {
                    op: op.symbol(),
                    coord,
                }),
            },
            UnaryOp::SizeOf => {
                self.op(Opcode::PushShort, &[4], usage.push());
                Ok(ValueType::Int)
            }
            UnaryOp::Deref | UnaryOp::Plus => Err(CompileError::UnsupportedOperator {
                op: op.symbol(),
                coord,
            }),
        }
    }

    /// `!x`: a directly lowered int comparison is inverted in place.
    fn not(&mut self, operand: &Expr, usage: Usage) -> Result<ValueType> {
        self.expr(operand, Usage::Value)?;
        let comparison =
            matches!(&operand.kind, ExprKind::Binary { op, .. } if op.is_comparison());
        if comparison
            && let Some(last) = self.last_instr_mut()
            && let Some(opposite) = last.opcode.opposite()
        {
            last.opcode = opposite;
            last.push = usage.push();
            return Ok(ValueType::Int);
        }
        self.op(Opcode::Not, &[], usage.push());
        Ok(ValueType::Int)
    }

    fn negate(&mut self, operand: &Expr, usage: Usage) -> Result<ValueType> {
        match operand.kind {
            ExprKind::Int { value } => {
                self.literal(value.wrapping_neg() as u32, usage);
                Ok(ValueType::Int)
            }
            ExprKind::Float { value } => {
                self.op(Opcode::PushInt, &[(-value as f32).to_bits()], usage.push());
                Ok(ValueType::Float)
            }
            _ => {
                let float = self.expr(operand, Usage::Value)?.is_float();
                let opcode = if float { Opcode::NegF } else { Opcode::NegI };
                self.op(opcode, &[], usage.push());
                Ok(if float { ValueType::Float } else { ValueType::Int })
            }
        }
    }

    /// `++`/`--` in either position.
    fn step(&mut self, operand: &Expr, increment: bool, usage: Usage) -> Result<ValueType> {
        let var = self.lvalue(operand)?;
        let opcode = match (increment, var.ty.is_float()) {
            (true, false) => Opcode::IncI,
            (false, false) => Opcode::DecI,
            (true, true) => Opcode::IncF,
            (false, true) => Opcode::DecF,
        };
        self.op(opcode, &var.params(), usage.push());
        Ok(var.ty.into())
    }

    fn binary(&mut self, op: BinaryOp, lhs: &Expr, rhs: &Expr, usage: Usage) -> Result<ValueType> {
        let (int_op, float_op) = match op {
            BinaryOp::And => return self.logical_and(lhs, rhs, usage),
            BinaryOp::Or => return self.logical_or(lhs, rhs, usage),
            BinaryOp::Add => (Opcode::AddI, Some(Opcode::AddF)),
            BinaryOp::Sub => (Opcode::SubI, Some(Opcode::SubF)),
            BinaryOp::Mul => (Opcode::MultI, Some(Opcode::MultF)),
            BinaryOp::Div => (Opcode::DivI, Some(Opcode::DivF)),
            BinaryOp::Mod => (Opcode::ModI, None),
            BinaryOp::BitAnd => (Opcode::BitAnd, None),
            BinaryOp::BitOr => (Opcode::BitOr, None),
            BinaryOp::BitXor => (Opcode::BitXor, None),
            BinaryOp::Shl => (Opcode::LeftShift, None),
            BinaryOp::Shr => (Opcode::RightShift, None),
            BinaryOp::Eq => (Opcode::Equals, Some(Opcode::FloatEqual)),
            BinaryOp::Ne => (Opcode::NotEquals, Some(Opcode::FloatNotEqual)),
            BinaryOp::Lt => (Opcode::LessThan, Some(Opcode::FloatLess)),
            BinaryOp::Le => (Opcode::LessOrEqual, Some(Opcode::FloatLessOrEqual)),
            BinaryOp::Gt => (Opcode::Greater, Some(Opcode::FloatGreater)),
            BinaryOp::Ge => (Opcode::GreaterOrEqual, Some(Opcode::FloatGreaterOrEqual)),
        };

        let left = self.expr(lhs, Usage::Value)?;
        let after_left = self.out.len();
        let right = self.expr(rhs, Usage::Value)?;

        // An unknown right operand takes the left operand's type.
        let left_float = left.is_float();
        let right_float = right.is_float() || (right == ValueType::Unknown && left_float);
        let float = left_float || right_float;

        if float && self.ctx.options.autocast && !int_op.is_bitwise() {
            if !right_float {
                self.op(Opcode::IntToFloat, &[0], false);
            }
            if !left_float {
                let cast = InstructionIR::values(Opcode::IntToFloat, &[0]);
                self.out.insert(after_left, Emit::Instr(cast));
            }
        }

        let opcode = match float_op {
            Some(f) if float => f,
            _ => int_op,
        };
        self.op(opcode, &[], usage.push());
        Ok(if opcode.produces_float() {
            ValueType::Float
        } else {
            ValueType::Int
        })
    }

    /// `1; else end; fail: 0; end:`
    fn boolean_tail(&mut self, fail: Label, usage: Usage) {
        let end = self.fresh();
        self.literal(1, usage);
        self.jump(Opcode::Else, end);
        self.place(fail);
        self.literal(0, usage);
        self.place(end);
    }

    fn logical_and(&mut self, lhs: &Expr, rhs: &Expr, usage: Usage) -> Result<ValueType> {
        let fail = self.fresh();
        self.expr(lhs, Usage::Value)?;
        self.jump(Opcode::If, fail);
        self.expr(rhs, Usage::Value)?;
        self.jump(Opcode::If, fail);
        self.boolean_tail(fail, usage);
        Ok(ValueType::Int)
    }

    fn logical_or(&mut self, lhs: &Expr, rhs: &Expr, usage: Usage) -> Result<ValueType> {
        let pass = self.fresh();
        let fail = self.fresh();
        self.expr(lhs, Usage::Value)?;
        self.jump(Opcode::IfNot, pass);
        self.expr(rhs, Usage::Value)?;
        self.jump(Opcode::If, fail);
        self.place(pass);
        self.boolean_tail(fail, usage);
        Ok(ValueType::Int)
    }

    fn ternary(
        &mut self,
        cond: &Expr,
        then: &Expr,
        otherwise: &Expr,
        usage: Usage,
    ) -> Result<ValueType> {
        if let Some(inner) = fused_condition(then, otherwise) {
            return self.logical_and(cond, inner, usage);
        }

        let fail = self.fresh();
        let end = self.fresh();
        self.expr(cond, Usage::Value)?;
        self.jump(Opcode::If, fail);
        self.expr(then, usage)?;
        self.jump(Opcode::Else, end);
        self.place(fail);
        let ty = self.expr(otherwise, usage)?;
        self.place(end);
        Ok(ty)
    }

    fn cast(&mut self, ty: Type, operand: &Expr, usage: Usage) -> Result<ValueType> {
        if usage == Usage::Discard {
            self.expr(operand, Usage::Discard)?;
            return Ok(ty.into());
        }
        self.expr(operand, Usage::Value)?;
        let opcode = if ty.is_float() {
            Opcode::IntToFloat
        } else {
            Opcode::FloatToInt
        };
        self.op(opcode, &[0], false);
        Ok(ty.into())
    }

    fn call(
        &mut self,
        callee: &Callee,
        args: &[Expr],
        usage: Usage,
        coord: Coord,
    ) -> Result<ValueType> {
        let name = match callee {
            Callee::Method { object, method } => {
                return self.method_call(object, method, args, usage, coord);
            }
            Callee::Deref { target } => {
                self.guarded_call(args, usage, |this| this.expr(target, Usage::Value).map(drop))?;
                return Ok(ValueType::Int);
            }
            Callee::Named { name } => name.as_str(),
        };

        match name {
            "printf" => {
                self.args(args)?;
                self.op(Opcode::Printf, &[args.len() as u32], usage.push());
                Ok(ValueType::Int)
            }
            "set_main" => self.deferred_call(Opcode::CallFunc2, name, args, coord),
            "callFunc3" => self.deferred_call(Opcode::CallFunc3, name, args, coord),
            _ => {
                if let Some(id) = self.ctx.syscalls.id(name) {
                    self.args(args)?;
                    self.op(Opcode::Sys, &[args.len() as u32, id], usage.push());
                    return Ok(syscall_type(id));
                }
                let ret = self
                    .ctx
                    .function(name)
                    .ok_or_else(|| CompileError::UnknownFunction {
                        name: name.to_string(),
                        coord,
                    })?;
                self.guarded_call(args, usage, |this| {
                    this.push_symbol(name, true);
                    Ok(())
                })?;
                Ok(ret.into())
            }
        }
    }

    fn args(&mut self, args: &[Expr]) -> Result<()> {
        for arg in args {
            self.expr(arg, Usage::Value)?;
        }
        Ok(())
    }

    /// `object.method(args)`: the method id travels as a leading argument.
    fn method_call(
        &mut self,
        object: &str,
        method: &str,
        args: &[Expr],
        usage: Usage,
        coord: Coord,
    ) -> Result<ValueType> {
        let syscalls = self.ctx.syscalls;
        let info = syscalls
            .table()
            .syscall(object)
            .ok_or_else(|| CompileError::UnknownSyscall {
                name: object.to_string(),
                coord,
            })?;
        let method_id = info
            .method(method)
            .ok_or_else(|| CompileError::UnknownMethod {
                syscall: object.to_string(),
                method: method.to_string(),
                coord,
            })?
            .id;

        self.op(Opcode::PushInt, &[method_id], true);
        self.args(args)?;
        self.op(Opcode::Sys, &[args.len() as u32 + 1, info.id], usage.push());
        Ok(syscall_type(info.id))
    }

    /// `set_main`/`callFunc3`: the function pointer is pushed after the
    /// remaining arguments.
    fn deferred_call(
        &mut self,
        opcode: Opcode,
        name: &str,
        args: &[Expr],
        coord: Coord,
    ) -> Result<ValueType> {
        let Some((pointer, rest)) = args.split_first() else {
            return Err(CompileError::MissingFunctionPointer {
                name: name.to_string(),
                coord,
            });
        };
        self.args(rest)?;
        self.expr(pointer, Usage::Value)?;
        self.op(opcode, &[rest.len() as u32], false);
        Ok(ValueType::Int)
    }

    /// `try end; args; callee; callFunc argc; end:`. The guard carries the
    /// push flag for the call's result.
    fn guarded_call(
        &mut self,
        args: &[Expr],
        usage: Usage,
        callee: impl FnOnce(&mut Self) -> Result<()>,
    ) -> Result<()> {
        let end = self.fresh();
        self.emit(InstructionIR::new(Opcode::Try, vec![end.into()]).with_push(usage.push()));
        self.args(args)?;
        callee(self)?;
        self.op(Opcode::CallFunc, &[args.len() as u32], false);
        self.place(end);
        Ok(())
    }
}

fn store_opcode(op: AssignOp, float: bool) -> Opcode {
    match (op, float) {
        (AssignOp::Set, false) => Opcode::SetVar,
        (AssignOp::Set, true) => Opcode::FloatVarSet,
        (AssignOp::Add, false) => Opcode::AddAssignI,
        (AssignOp::Add, true) => Opcode::AddAssignF,
        (AssignOp::Sub, false) => Opcode::SubAssignI,
        (AssignOp::Sub, true) => Opcode::SubAssignF,
        (AssignOp::Mul, false) => Opcode::MultAssignI,
        (AssignOp::Mul, true) => Opcode::MultAssignF,
        (AssignOp::Div, false) => Opcode::DivAssignI,
        (AssignOp::Div, true) => Opcode::DivAssignF,
        (AssignOp::Mod, _) => Opcode::ModAssignI,
        (AssignOp::And, _) => Opcode::AndAssignI,
        (AssignOp::Or, _) => Opcode::OrAssignI,
        (AssignOp::Xor, _) => Opcode::XorAssignI,
    }
}

fn syscall_type(id: u32) -> ValueType {
    if returns_float(id) {
        ValueType::Float
    } else {
        ValueType::Unknown
    }
}

/// Inner condition of `c1 ? (c2 ? 1 : 0) : 0`.
fn fused_condition<'e>(then: &'e Expr, otherwise: &Expr) -> Option<&'e Expr> {
    let ExprKind::Ternary {
        cond,
        then: one,
        otherwise: zero,
    } = &then.kind
    else {
        return None;
    };
    let is_int = |e: &Expr, v: i64| matches!(e.kind, ExprKind::Int { value } if value == v);
    (is_int(one, 1) && is_int(zero, 0) && is_int(otherwise, 0)).then_some(cond.as_ref())
}
