//! Lightweight lexical checks on GLSL ES 1.00 source.
//!
//! Not a compiler. Just enough structure for the tracing context to
//! reject obviously broken shaders, resolve attribute/uniform names, and
//! catch varying mismatches at link time.

/// Storage qualifier of a global declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Qualifier {
    Attribute,
    Uniform,
    Varying,
}

/// One declared global, e.g. `uniform vec2 u_resolution`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Declaration {
    pub qualifier: Qualifier,
    pub ty: String,
    pub name: String,
}

/// Returns a driver-style error message if `source` is structurally invalid.
pub(crate) fn check_structure(source: &str) -> Result<(), String> {
    let code = strip_comments(source);

    let mut braces = 0_i32;
    let mut parens = 0_i32;
    for (line_no, line) in code.lines().enumerate() {
        for ch in line.chars() {
            match ch {
                '{' => braces += 1,
                '}' => braces -= 1,
                '(' => parens += 1,
                ')' => parens -= 1,
                _ => {}
            }
            if braces < 0 || parens < 0 {
                return Err(format!(
                    "ERROR: 0:{}: '{ch}' : syntax error",
                    line_no + 1
                ));
            }
        }
    }
    if braces != 0 {
        return Err("ERROR: 0:?: '' : unexpected end of file, unbalanced '{'".to_string());
    }
    if parens != 0 {
        return Err("ERROR: 0:?: '' : unexpected end of file, unbalanced '('".to_string());
    }

    let squeezed: String = code.split_whitespace().collect();
    if !squeezed.contains("voidmain()") && !squeezed.contains("voidmain(void)") {
        return Err("ERROR: 0:?: 'main' : function not found".to_string());
    }
    Ok(())
}

/// Collects `attribute`, `uniform` and `varying` globals in declaration order.
pub(crate) fn declarations(source: &str) -> Vec<Declaration> {
    let code = strip_comments(source);
    let mut out = Vec::new();

    for statement in code.split(&[';', '{', '}'][..]) {
        let mut tokens = statement.split_whitespace();
        let qualifier = match tokens.next() {
            Some("attribute") => Qualifier::Attribute,
            Some("uniform") => Qualifier::Uniform,
            Some("varying") => Qualifier::Varying,
            _ => continue,
        };
        let mut rest: Vec<&str> = tokens.collect();
        if matches!(rest.first(), Some(&("lowp" | "mediump" | "highp"))) {
            rest.remove(0);
        }
        let Some((ty, names)) = rest.split_first() else {
            continue;
        };
        for name in names.join(" ").split(',') {
            let name = name.split('[').next().unwrap_or("").trim();
            if !name.is_empty() {
                out.push(Declaration {
                    qualifier,
                    ty: (*ty).to_string(),
                    name: name.to_string(),
                });
            }
        }
    }
    out
}

/// Names declared with the given qualifier, in order.
pub(crate) fn names_with(decls: &[Declaration], qualifier: Qualifier) -> Vec<String> {
    decls
        .iter()
        .filter(|d| d.qualifier == qualifier)
        .map(|d| d.name.clone())
        .collect()
}

/// Checks the varying interface between the two stages.
///
/// A varying the fragment stage reads (references outside its declaration)
/// must be declared by the vertex stage. A varying declared by both stages
/// must have the same type in each. Declared but unread fragment varyings
/// are allowed. Returns a linker-style log on failure.
pub(crate) fn check_varyings(
    vertex: &[Declaration],
    fragment: &[Declaration],
    fragment_source: &str,
) -> Result<(), String> {
    let fragment_code = strip_comments(fragment_source);
    let problems: Vec<String> = fragment
        .iter()
        .filter(|d| d.qualifier == Qualifier::Varying)
        .filter_map(|frag| {
            let vert = vertex
                .iter()
                .find(|v| v.qualifier == Qualifier::Varying && v.name == frag.name);
            match vert {
                None if !is_referenced(&fragment_code, &frag.name) => None,
                None => Some(format!(
                    "error: varying '{}' is read by the fragment shader but not declared in the vertex shader",
                    frag.name
                )),
                Some(v) if v.ty != frag.ty => Some(format!(
                    "error: varying '{}' has type {} in the vertex shader but {} in the fragment shader",
                    frag.name, v.ty, frag.ty
                )),
                Some(_) => None,
            }
        })
        .collect();

    if problems.is_empty() {
        Ok(())
    } else {
        Err(problems.join("\n"))
    }
}

/// True if `name` appears as an identifier more than once, i.e. somewhere
/// besides its own declaration.
fn is_referenced(code: &str, name: &str) -> bool {
    code.split(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .filter(|token| *token == name)
        .count()
        > 1
}

fn strip_comments(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    let mut chars = source.chars().peekable();
    while let Some(ch) = chars.next() {
        match (ch, chars.peek()) {
            ('/', Some('/')) => {
                for c in chars.by_ref() {
                    if c == '\n' {
                        out.push('\n');
                        break;
                    }
                }
            }
            ('/', Some('*')) => {
                chars.next();
                let mut prev = ' ';
                for c in chars.by_ref() {
                    if c == '\n' {
                        out.push('\n');
                    }
                    if prev == '*' && c == '/' {
                        break;
                    }
                    prev = c;
                }
            }
            _ => out.push(ch),
        }
    }
    out
}
