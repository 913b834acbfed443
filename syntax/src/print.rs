//! Tree → text. Canonical serialization via `Display`.
//!
//! The printed form is re-readable by [`crate::parse_source`]: parsing the
//! output of `Display` yields a structurally equal tree. Raw block bodies are
//! emitted verbatim and never re-indented, which is what keeps the round trip
//! stable.

use std::fmt::{self, Write as _};

use crate::decl::{
    Decl, DeclList, ExtensionDecl, FuncDecl, IfConfigDecl, InitDecl, Parameter, SourceFile,
    StructDecl, VarDecl,
};

const INDENT: &str = "    ";

fn write_indent(f: &mut fmt::Formatter<'_>, level: usize) -> fmt::Result {
    for _ in 0..level {
        f.write_str(INDENT)?;
    }
    Ok(())
}

/// Write a raw block body. Single-line bodies stay on one line; multi-line
/// bodies are emitted verbatim between the braces.
fn write_block(f: &mut fmt::Formatter<'_>, body: &str, level: usize) -> fmt::Result {
    if body.is_empty() {
        f.write_str(" {}")
    } else if body.contains('\n') {
        f.write_str(" {\n")?;
        f.write_str(body)?;
        f.write_str("\n")?;
        write_indent(f, level)?;
        f.write_str("}")
    } else {
        write!(f, " {{ {body} }}")
    }
}

fn write_prefix(f: &mut fmt::Formatter<'_>, attributes: &[String], modifiers: &[String]) -> fmt::Result {
    for attr in attributes {
        write!(f, "{attr} ")?;
    }
    for modifier in modifiers {
        write!(f, "{modifier} ")?;
    }
    Ok(())
}

fn write_var(f: &mut fmt::Formatter<'_>, var: &VarDecl, level: usize) -> fmt::Result {
    write_prefix(f, &var.attributes, &var.modifiers)?;
    write!(f, "{} {}", var.keyword.as_str(), var.name)?;
    if let Some(ty) = &var.ty {
        write!(f, ": {ty}")?;
    }
    if let Some(expr) = &var.initializer {
        write!(f, " = {expr}")?;
    }
    if let Some(accessor) = &var.accessor {
        write_block(f, accessor, level)?;
    }
    Ok(())
}

fn write_parameter(f: &mut fmt::Formatter<'_>, param: &Parameter) -> fmt::Result {
    if let Some(label) = &param.label {
        write!(f, "{label} ")?;
    }
    write!(f, "{}: {}", param.name, param.ty)?;
    if let Some(default) = &param.default {
        write!(f, " = {default}")?;
    }
    Ok(())
}

fn write_init(f: &mut fmt::Formatter<'_>, init: &InitDecl, level: usize) -> fmt::Result {
    write_prefix(f, &[], &init.modifiers)?;
    f.write_str("init")?;
    if init.failable {
        f.write_char('?')?;
    }
    f.write_char('(')?;
    for (index, param) in init.parameters.iter().enumerate() {
        if index > 0 {
            f.write_str(", ")?;
        }
        write_parameter(f, param)?;
    }
    f.write_char(')')?;
    write_block(f, &init.body, level)
}

fn write_func(f: &mut fmt::Formatter<'_>, func: &FuncDecl, level: usize) -> fmt::Result {
    write_prefix(f, &func.attributes, &func.modifiers)?;
    write!(f, "func {}{}", func.name, func.signature)?;
    write_block(f, &func.body, level)
}

fn write_struct(f: &mut fmt::Formatter<'_>, decl: &StructDecl, level: usize) -> fmt::Result {
    write_prefix(f, &decl.attributes, &decl.modifiers)?;
    writeln!(f, "struct {} {{", decl.name)?;
    write_members(f, &decl.members, level + 1)?;
    write_indent(f, level)?;
    f.write_char('}')
}

fn write_extension(f: &mut fmt::Formatter<'_>, ext: &ExtensionDecl, level: usize) -> fmt::Result {
    writeln!(f, "extension {} {{", ext.extended)?;
    write_members(f, &ext.members, level + 1)?;
    write_indent(f, level)?;
    f.write_char('}')
}

fn write_ifconfig(f: &mut fmt::Formatter<'_>, block: &IfConfigDecl, level: usize) -> fmt::Result {
    for clause in &block.clauses {
        match &clause.condition {
            Some(condition) => writeln!(f, "{} {condition}", clause.keyword.as_str())?,
            None => writeln!(f, "{}", clause.keyword.as_str())?,
        }
        write_members(f, &clause.members, level)?;
    }
    f.write_str("#endif")
}

fn write_members(f: &mut fmt::Formatter<'_>, members: &DeclList, level: usize) -> fmt::Result {
    for decl in members {
        // #if directives are column-zero constructs; everything else indents.
        if matches!(decl, Decl::IfConfig(_)) {
            write_decl(f, decl, level)?;
        } else {
            write_indent(f, level)?;
            write_decl(f, decl, level)?;
        }
        f.write_char('\n')?;
    }
    Ok(())
}

fn write_decl(f: &mut fmt::Formatter<'_>, decl: &Decl, level: usize) -> fmt::Result {
    match decl {
        Decl::Var(var) => write_var(f, var, level),
        Decl::Init(init) => write_init(f, init, level),
        Decl::Func(func) => write_func(f, func, level),
        Decl::Struct(s) => write_struct(f, s, level),
        Decl::Extension(ext) => write_extension(f, ext, level),
        Decl::IfConfig(block) => write_ifconfig(f, block, level),
    }
}

impl fmt::Display for Decl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_decl(f, self, 0)
    }
}

impl fmt::Display for DeclList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_members(f, self, 0)
    }
}

impl fmt::Display for SourceFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_members(f, self.decls(), 0)
    }
}

#[cfg(test)]
mod tests {
    use crate::parse_source;

    #[track_caller]
    fn assert_round_trip(source: &str) {
        let parsed = parse_source(source).expect("fixture parses");
        let printed = parsed.to_string();
        let reparsed = parse_source(&printed)
            .unwrap_or_else(|err| panic!("printed form failed to re-parse: {err}\n{printed}"));
        assert_eq!(parsed, reparsed, "round trip diverged:\n{printed}");
    }

    #[test]
    fn round_trips_plain_members() {
        assert_round_trip("var a: Int\nlet b = 2\nvar c: Int { fatalError() }\n");
    }

    #[test]
    fn round_trips_struct_with_ifconfig() {
        assert_round_trip(
            "@_fixed_layout struct X {\n    #if os(iOS)\n    var a1: Int\n    #endif\n    var a2: Int { fatalError() }\n}\n",
        );
    }

    #[test]
    fn round_trips_init_and_func() {
        assert_round_trip(
            "struct Y {\n    var a: Int = 1\n    init(a: Int = 1) { self.a = a }\n    func f(x: Int) -> Int { x }\n}\n",
        );
    }

    #[test]
    fn round_trips_extension_and_else_clauses() {
        assert_round_trip(
            "extension X: Equatable {\n    func g() {}\n}\n#if os(iOS)\nvar a: Int\n#else\nvar b: Int\n#endif\n",
        );
    }
}
