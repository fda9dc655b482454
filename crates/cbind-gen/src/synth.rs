//! Wrapper synthesis.
//!
//! [`Synthesizer::synthesize`] turns one normalized [`Function`] into a
//! [`FuncDecl`] in a single pass: declarations for slices and output
//! arguments, string conversions, the foreign call, then the return.
//! Every parameter and the return go through the shape classification in
//! [`crate::shape`], so each branch below handles exactly one shape.

use cbind_core::{Function, NormalizedType, TypeTags};
use tracing::debug;

use crate::shape::{
    classify_param, classify_return, OutputKind, ParamShape, ReturnShape, SliceElement,
};
use crate::syntax::{BinOp, Expr, Field, FuncDecl, GoType, Stmt};

/// Local holding the foreign call result.
const RESULT: &str = "o";
/// Slice loop index.
const INDEX: &str = "i";
/// Per-element string copy inside a slice loop.
const ELEMENT_STRING: &str = "ci_str";

/// Turns normalized functions into wrapper source.
#[derive(Debug, Clone, Default)]
pub struct Synthesizer {
    tags: TypeTags,
}

impl Synthesizer {
    pub fn new(tags: TypeTags) -> Self {
        Self { tags }
    }

    pub fn tags(&self) -> &TypeTags {
        &self.tags
    }

    /// Render the wrapper for `function`.
    pub fn generate(&self, function: &Function) -> String {
        let source = self.synthesize(function).render();
        debug!(
            function = %function.name,
            symbol = %function.foreign_call_name,
            "synthesized wrapper"
        );
        source
    }

    /// Build the wrapper declaration for `function`.
    pub fn synthesize(&self, function: &Function) -> FuncDecl {
        let shapes: Vec<ParamShape<'_>> = function
            .parameters
            .iter()
            .map(|p| classify_param(&p.ty, &self.tags))
            .collect();

        let mut body = Vec::new();
        let mut params = Vec::new();
        let mut outputs: Vec<(GoType, Expr)> = Vec::new();

        for (index, (param, shape)) in function.parameters.iter().zip(&shapes).enumerate() {
            let name = function.parameter_name(index);
            if shape.is_declared() && !function.is_receiver_position(index) {
                params.push(Field::named(name, self.declared_type(&param.ty)));
            }

            match shape {
                ParamShape::Slice(element) => self.copy_slice(&mut body, name, &param.ty, *element),
                ParamShape::Output(kind) => {
                    outputs.push(self.declare_output(&mut body, name, &param.ty, *kind));
                }
                ParamShape::SliceLength { .. }
                | ParamShape::CString
                | ParamShape::Struct
                | ParamShape::Primitive => {}
            }
        }
        // The renderer drops blanks that end up leading or doubled.
        body.push(Stmt::Blank);

        for (index, shape) in shapes.iter().enumerate() {
            if *shape == ParamShape::CString {
                let name = function.parameter_name(index);
                let copy = format!("c_{name}");
                body.push(Stmt::Define(
                    copy.clone(),
                    Expr::cgo("CString").call(vec![Expr::ident(name)]),
                ));
                body.push(Stmt::Defer(free(&copy)));
            }
        }
        body.push(Stmt::Blank);

        let args = function
            .parameters
            .iter()
            .zip(&shapes)
            .enumerate()
            .map(|(index, (param, shape))| {
                call_argument(function.parameter_name(index), &param.ty, shape)
            })
            .collect();
        let call = Expr::cgo(&function.foreign_call_name).call(args);

        let mut results = Vec::new();
        let mut values = Vec::new();
        if let Some((ty, value)) = self.primary_result(function, call, !outputs.is_empty(), &mut body) {
            results.push(Field::unnamed(ty));
            values.push(value);
        }
        for (ty, value) in outputs {
            results.push(Field::unnamed(ty));
            values.push(value);
        }
        if !values.is_empty() {
            body.push(Stmt::Blank);
            body.push(Stmt::Return(values));
        }

        FuncDecl {
            doc: function.doc.clone(),
            receiver: function
                .receiver
                .as_ref()
                .filter(|_| function.binds_receiver())
                .map(|r| Field::named(&r.name, GoType::named(&r.ty.name))),
            name: function.name.clone(),
            params,
            results,
            body,
        }
    }

    /// Type a parameter is declared with.
    fn declared_type(&self, ty: &NormalizedType) -> GoType {
        let base = if self.tags.is_char_pointer(ty) {
            GoType::named(&self.tags.native_string)
        } else {
            GoType::named(&ty.name)
        };
        if ty.is_slice {
            base.slice_of()
        } else {
            base
        }
    }

    /// Backing array, backing pointer and element copy loop for a slice.
    fn copy_slice(
        &self,
        body: &mut Vec<Stmt>,
        name: &str,
        ty: &NormalizedType,
        element: SliceElement,
    ) {
        let array = format!("ca_{name}");
        let pointer = format!("cp_{name}");

        let mut elem = if self.tags.is_char_pointer(ty) {
            GoType::cgo("char")
        } else {
            GoType::cgo(ty.foreign_cast())
        };
        for _ in 1..ty.pointer_depth {
            elem = elem.pointer_to();
        }

        body.push(Stmt::Define(
            array.clone(),
            Expr::ident("make").call(vec![Expr::Type(elem.clone().slice_of()), Expr::len_of(name)]),
        ));
        body.push(Stmt::Var(pointer.clone(), elem.pointer_to()));
        body.push(Stmt::If(
            Expr::len_of(name).binary(BinOp::Gt, Expr::Int(0)),
            vec![Stmt::Assign(
                Expr::ident(&pointer),
                Expr::ident(&array).index(Expr::Int(0)).addr(),
            )],
        ));

        let item = Expr::ident(name).index(Expr::ident(INDEX));
        let slot = Expr::ident(&array).index(Expr::ident(INDEX));
        let copy = match element {
            SliceElement::CString => vec![
                Stmt::Define(
                    ELEMENT_STRING.to_string(),
                    Expr::cgo("CString").call(vec![item]),
                ),
                Stmt::Defer(free(ELEMENT_STRING)),
                Stmt::Assign(slot, Expr::ident(ELEMENT_STRING)),
            ],
            SliceElement::Struct => vec![Stmt::Assign(slot, item.field("c"))],
            SliceElement::Primitive => {
                vec![Stmt::Assign(slot, Expr::cgo_cast(ty.foreign_cast(), item))]
            }
        };
        body.push(Stmt::Range {
            key: INDEX.to_string(),
            over: Expr::ident(name),
            body: copy,
        });
    }

    /// Declare the variable an output argument is written into.
    ///
    /// Returns the result type and the expression that reads the value back.
    fn declare_output(
        &self,
        body: &mut Vec<Stmt>,
        name: &str,
        ty: &NormalizedType,
        kind: OutputKind,
    ) -> (GoType, Expr) {
        let var = Expr::ident(name);
        let (var_ty, result_ty, value) = match kind {
            OutputKind::OwnedString => (
                GoType::named(&ty.name),
                GoType::named(&self.tags.native_string),
                var.method("String"),
            ),
            OutputKind::Primitive => (
                GoType::cgo(ty.foreign_cast()),
                GoType::named(&ty.name),
                Expr::cast(&ty.name, var),
            ),
            OutputKind::Value => (GoType::named(&ty.name), GoType::named(&ty.name), var),
        };

        body.push(Stmt::Var(name.to_string(), var_ty));
        if kind == OutputKind::OwnedString {
            body.push(Stmt::Defer(Expr::ident(name).method("Dispose")));
        }
        (result_ty, value)
    }

    /// Emit the call and produce the wrapper's own result, if it has one.
    ///
    /// With output arguments present the result is bound to a local first
    /// so the outputs are only read after the call has run.
    fn primary_result(
        &self,
        function: &Function,
        call: Expr,
        has_outputs: bool,
        body: &mut Vec<Stmt>,
    ) -> Option<(GoType, Expr)> {
        let ty = &function.return_type;
        let result = Expr::ident(RESULT);

        let (result_ty, value) = match classify_return(function, has_outputs, &self.tags) {
            ReturnShape::Nothing | ReturnShape::OutputsOnly => {
                body.push(Stmt::Expr(call));
                return None;
            }
            ReturnShape::OwnedString => {
                body.push(Stmt::Define(
                    RESULT.to_string(),
                    Expr::Composite(ty.name.clone(), vec![call]),
                ));
                body.push(Stmt::Defer(result.clone().method("Dispose")));
                return Some((
                    GoType::named(&self.tags.native_string),
                    result.method("String"),
                ));
            }
            ReturnShape::Boolean { foreign } => {
                body.push(Stmt::Define(RESULT.to_string(), call));
                return Some((
                    GoType::named(&ty.name),
                    result.binary(BinOp::Ne, Expr::cgo_cast(foreign, Expr::Int(0))),
                ));
            }
            ReturnShape::CharPointer => (
                GoType::named(&self.tags.native_string),
                Expr::cgo_cast("GoString", call),
            ),
            ReturnShape::Timestamp => (
                GoType::named(&ty.name),
                Expr::ident("time")
                    .field("Unix")
                    .call(vec![Expr::cast("int64", call), Expr::Int(0)]),
            ),
            ReturnShape::Reshaped { composite: true } => (
                GoType::named(&ty.name),
                Expr::Composite(ty.name.clone(), vec![call]),
            ),
            ReturnShape::Reshaped { composite: false } => {
                (GoType::named(&ty.name), Expr::cast(&ty.name, call))
            }
        };

        if has_outputs {
            body.push(Stmt::Define(RESULT.to_string(), value));
            Some((result_ty, result))
        } else {
            Some((result_ty, value))
        }
    }
}

/// Argument passed to the foreign call for one parameter.
fn call_argument(name: &str, ty: &NormalizedType, shape: &ParamShape<'_>) -> Expr {
    match shape {
        ParamShape::SliceLength { slice } => Expr::cgo_cast(ty.foreign_cast(), Expr::len_of(slice)),
        ParamShape::Slice(_) => Expr::ident(format!("cp_{name}")),
        ParamShape::Output(OutputKind::Primitive) => Expr::ident(name).addr(),
        ParamShape::Output(_) => Expr::ident(name).field("c").addr(),
        ParamShape::CString => Expr::ident(format!("c_{name}")),
        ParamShape::Struct => Expr::ident(name).field("c"),
        ParamShape::Primitive => Expr::cgo_cast(ty.foreign_cast(), Expr::ident(name)),
    }
}

/// `C.free(unsafe.Pointer(name))`
fn free(name: &str) -> Expr {
    Expr::cgo("free").call(vec![Expr::ident("unsafe")
        .field("Pointer")
        .call(vec![Expr::ident(name)])])
}
