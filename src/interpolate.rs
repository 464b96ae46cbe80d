// Author: Dustin Pilgrim
// License: MIT

use crate::resolver::NodeRef;
use crate::JcfError;

/// Deepest chain of `$a$ -> $b$ -> ...` references followed before giving up.
pub const MAX_DEPTH: usize = 32;

/// Most `$name$` lookups one read may make, nested ones included.
///
/// Lookups are not cached, so a value that uses a reference twice expands
/// it twice; this caps the total work of a single read.
pub const MAX_LOOKUPS: usize = 10_000;

/// Work spent so far by one top-level read.
#[derive(Debug, Default)]
pub(crate) struct Expansion {
    lookups: usize,
}

/// Expand every `$name$` in `text` against `scope`.
///
/// `name` is any path. It is looked up in `scope` first and then in each
/// ancestor up to the root. `$$` is a literal `$`. A `$` with no closing
/// partner is kept as written.
pub fn translate(scope: &NodeRef<'_>, text: &str) -> Result<String, JcfError> {
    translate_within(scope, text, 0, &mut Expansion::default())
}

pub(crate) fn translate_within(
    scope: &NodeRef<'_>,
    text: &str,
    depth: usize,
    expansion: &mut Expansion,
) -> Result<String, JcfError> {
    if !text.contains('$') {
        return Ok(text.to_string());
    }

    let mut out = String::with_capacity(text.len());
    let mut name = String::new();
    let mut in_name = false;

    for ch in text.chars() {
        if ch == '$' {
            if in_name {
                if name.is_empty() {
                    out.push('$');
                } else {
                    out.push_str(&lookup(scope, &name, depth, expansion)?);
                    name.clear();
                }
            }
            in_name = !in_name;
        } else if in_name {
            name.push(ch);
        } else {
            out.push(ch);
        }
    }

    if in_name {
        out.push('$');
        out.push_str(&name);
    }

    Ok(out)
}

fn lookup(scope: &NodeRef<'_>, name: &str, depth: usize, expansion: &mut Expansion) -> Result<String, JcfError> {
    if depth >= MAX_DEPTH {
        return Err(JcfError::Lookup {
            name: name.to_string(),
            message: format!("Gave up after {} nested references", MAX_DEPTH),
            hint: Some("Check for a value that refers back to itself".into()),
            code: Some(502),
        });
    }

    expansion.lookups += 1;
    if expansion.lookups > MAX_LOOKUPS {
        return Err(JcfError::Lookup {
            name: name.to_string(),
            message: format!("Gave up after {} lookups in one read", MAX_LOOKUPS),
            hint: Some("A value repeats references that themselves repeat references".into()),
            code: Some(502),
        });
    }

    let mut current = Some(scope.clone());
    while let Some(node) = current {
        match node.get_scalar_within(name, depth + 1, expansion) {
            Ok(value) => return Ok(value),
            Err(e) if e.is_soft() => current = node.parent(),
            Err(e) => return Err(e),
        }
    }

    Err(JcfError::Lookup {
        name: name.to_string(),
        message: format!("Can't find '{}' in this block or any enclosing block", name),
        hint: Some("Referenced keys must hold a scalar".into()),
        code: Some(501),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    #[test]
    fn test_parent_fallback() {
        let doc = parse("Name: srv\nSub: {\n    Greeting: Hello $Name$\n}\n").unwrap();
        assert_eq!(doc.get_scalar("Sub.Greeting").unwrap(), "Hello srv");
    }

    #[test]
    fn test_local_value_shadows_ancestor() {
        let doc = parse("Name: outer\nSub: {\n    Name: inner\n    Greeting: Hi $Name$\n}\n").unwrap();
        assert_eq!(doc.get_scalar("Sub.Greeting").unwrap(), "Hi inner");
    }

    #[test]
    fn test_dotted_reference_and_nested_expansion() {
        let input = "\
Host: example.org
Paths: {
    Root: /srv/$Host$
}
Site: {
    Index: $Paths.Root$/index.html
}
";
        let doc = parse(input).unwrap();
        assert_eq!(doc.get_scalar("Site.Index").unwrap(), "/srv/example.org/index.html");
    }

    #[test]
    fn test_referenced_value_expands_in_its_own_scope() {
        let input = "\
Name: root
Inner: {
    Name: inner
    Label: <$Name$>
}
Use: $Inner.Label$
";
        let doc = parse(input).unwrap();
        assert_eq!(doc.get_scalar("Use").unwrap(), "<inner>");
    }

    #[test]
    fn test_list_element_falls_back_to_containing_block() {
        let input = "Server: {\n    Port: 80\n    Routes: [\n        { Url: http://localhost:$Port$/ }\n    ]\n}\n";
        let doc = parse(input).unwrap();
        assert_eq!(doc.get_scalar("Server.Routes#0.Url").unwrap(), "http://localhost:80/");
    }

    #[test]
    fn test_missing_reference_is_hard_error() {
        let doc = parse("A: {\n    B: $Nope$\n}\n").unwrap();
        assert!(matches!(doc.get_scalar("A.B"), Err(JcfError::Lookup { code: Some(501), .. })));
    }

    #[test]
    fn test_reference_to_block_is_not_found() {
        let doc = parse("Blk: {\n    x: 1\n}\nV: $Blk$\n").unwrap();
        assert!(matches!(doc.get_scalar("V"), Err(JcfError::Lookup { .. })));
    }

    #[test]
    fn test_self_reference_is_cut_off() {
        let doc = parse("A: $B$\nB: $A$\n").unwrap();
        assert!(matches!(doc.get_scalar("A"), Err(JcfError::Lookup { code: Some(502), .. })));
    }

    fn doubling_chain(levels: usize) -> String {
        let mut input = String::from("a0: x\n");
        for i in 1..=levels {
            input.push_str(&format!("a{}: $a{}$$a{}$\n", i, i - 1, i - 1));
        }
        input
    }

    #[test]
    fn test_repeated_references_within_budget() {
        let doc = parse(&doubling_chain(10)).unwrap();
        assert_eq!(doc.get_scalar("a10").unwrap(), "x".repeat(1024));
    }

    #[test]
    fn test_exponential_expansion_is_cut_off() {
        let doc = parse(&doubling_chain(24)).unwrap();
        let err = doc.get_scalar("a24").unwrap_err();
        assert!(matches!(err, JcfError::Lookup { code: Some(502), .. }));

        // The budget is per read, not shared between reads.
        assert_eq!(doc.get_scalar("a3").unwrap(), "xxxxxxxx");
    }

    #[test]
    fn test_dollar_escapes() {
        let doc = parse("Price: 5$$\nOpen: cost $5\n").unwrap();
        assert_eq!(doc.get_scalar("Price").unwrap(), "5$");
        assert_eq!(doc.get_scalar("Open").unwrap(), "cost $5");
    }

    #[test]
    fn test_raw_read_skips_interpolation() {
        let doc = parse("Name: srv\nGreeting: Hello $Name$\n").unwrap();
        assert_eq!(doc.get_raw("Greeting").unwrap(), "Hello $Name$");
    }
}
