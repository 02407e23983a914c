//! URI template expansion against the RFC 6570 section 3.2 examples.

use pagekit::template::{Bindings, Template, TemplateError, Value};

fn rfc_bindings() -> Bindings {
    Bindings::new()
        .with("var", "value")
        .with("hello", "Hello World!")
        .with("half", "50%")
        .with("empty", "")
        .with("path", "/foo/bar")
        .with("base", "http://example.com/home/")
        .with("x", 1024i64)
        .with("y", 768i64)
        .with("list", vec!["red", "green", "blue"])
        .with(
            "keys",
            vec![("semi", ";"), ("dot", "."), ("comma", ",")],
        )
        .with("empty_keys", Value::Assoc(vec![]))
}

fn table(templates: &[&str]) -> String {
    let bindings = rfc_bindings();
    templates
        .iter()
        .map(|source| {
            let expanded = Template::parse(source).unwrap().expand(&bindings);
            format!("{source} => {expanded}")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn test_simple_and_reserved_expansion() {
    insta::assert_snapshot!(table(&[
        "{var}",
        "{hello}",
        "{half}",
        "O{empty}X",
        "O{undef}X",
        "{x,y}",
        "{x,hello,y}",
        "?{x,empty}",
        "?{x,undef}",
        "?{undef,y}",
        "{var:3}",
        "{var:30}",
        "{list}",
        "{list*}",
        "{keys}",
        "{keys*}",
        "{+var}",
        "{+hello}",
        "{+half}",
        "{base}index",
        "{+base}index",
        "{+path}/here",
        "here?ref={+path}",
        "{+keys}",
        "{+keys*}",
    ]), @r###"
    {var} => value
    {hello} => Hello%20World%21
    {half} => 50%25
    O{empty}X => OX
    O{undef}X => OX
    {x,y} => 1024,768
    {x,hello,y} => 1024,Hello%20World%21,768
    ?{x,empty} => ?1024,
    ?{x,undef} => ?1024
    ?{undef,y} => ?768
    {var:3} => val
    {var:30} => value
    {list} => red,green,blue
    {list*} => red,green,blue
    {keys} => semi,%3B,dot,.,comma,%2C
    {keys*} => semi=%3B,dot=.,comma=%2C
    {+var} => value
    {+hello} => Hello%20World!
    {+half} => 50%25
    {base}index => http%3A%2F%2Fexample.com%2Fhome%2Findex
    {+base}index => http://example.com/home/index
    {+path}/here => /foo/bar/here
    here?ref={+path} => here?ref=/foo/bar
    {+keys} => semi,;,dot,.,comma,,
    {+keys*} => semi=;,dot=.,comma=,
    "###);
}

#[test]
fn test_prefixed_operator_expansion() {
    insta::assert_snapshot!(table(&[
        "{#var}",
        "{#hello}",
        "{#path:6}/here",
        "{#list*}",
        "{#keys*}",
        "X{.var}",
        "X{.x,y}",
        "X{.list*}",
        "X{.keys*}",
        "X{.empty_keys}",
        "{/var}",
        "{/var,x}/here",
        "{/list*}",
        "{/list*,path:4}",
        "{/keys*}",
        "{;x,y}",
        "{;x,y,empty}",
        "{;list*}",
        "{;keys*}",
        "{?x,y}",
        "{?x,y,empty}",
        "{?list}",
        "{?list*}",
        "{?keys}",
        "{?keys*}",
        "?fixed=yes{&x}",
        "{&x,y,empty}",
    ]), @r###"
    {#var} => #value
    {#hello} => #Hello%20World!
    {#path:6}/here => #/foo/b/here
    {#list*} => #red,green,blue
    {#keys*} => #semi=;,dot=.,comma=,
    X{.var} => X.value
    X{.x,y} => X.1024.768
    X{.list*} => X.red.green.blue
    X{.keys*} => X.semi=%3B.dot=..comma=%2C
    X{.empty_keys} => X
    {/var} => /value
    {/var,x}/here => /value/1024/here
    {/list*} => /red/green/blue
    {/list*,path:4} => /red/green/blue/%2Ffoo
    {/keys*} => /semi=%3B/dot=./comma=%2C
    {;x,y} => ;x=1024;y=768
    {;x,y,empty} => ;x=1024;y=768;empty
    {;list*} => ;list=red;list=green;list=blue
    {;keys*} => ;semi=%3B;dot=.;comma=%2C
    {?x,y} => ?x=1024&y=768
    {?x,y,empty} => ?x=1024&y=768&empty=
    {?list} => ?list=red,green,blue
    {?list*} => ?list=red&list=green&list=blue
    {?keys} => ?keys=semi,%3B,dot,.,comma,%2C
    {?keys*} => ?semi=%3B&dot=.&comma=%2C
    ?fixed=yes{&x} => ?fixed=yes&x=1024
    {&x,y,empty} => &x=1024&y=768&empty=
    "###);
}

#[test]
fn test_users_template_variants() {
    let template = Template::parse("/users{/username}{?query*}").unwrap();

    let full = Bindings::new()
        .with("username", "foobar")
        .with("query", vec![("recent_posts", "true")]);
    assert_eq!(template.expand(&full), "/users/foobar?recent_posts=true");
    assert_eq!(
        template.expand(&Bindings::new().with("username", "foobar")),
        "/users/foobar"
    );
    assert_eq!(template.expand(&Bindings::new()), "/users");
}

#[test]
fn test_chained_query_expressions() {
    let template = Template::parse("/search{?q}{?page}{&sort}").unwrap();
    let bindings = Bindings::new()
        .with("q", "rust")
        .with("page", 2i64)
        .with("sort", "desc");
    assert_eq!(template.expand(&bindings), "/search?q=rust&page=2&sort=desc");

    let only_page = Bindings::new().with("page", 2i64);
    assert_eq!(template.expand(&only_page), "/search?page=2");
}

#[test]
fn test_reserved_expansion_opens_query() {
    let bindings = Bindings::new().with("base", "/a?b=1").with("x", 2i64);
    let reserved = Template::parse("{+base}{?x}").unwrap().expand(&bindings);
    let literal = Template::parse("/a?b=1{?x}").unwrap().expand(&bindings);
    assert_eq!(reserved, "/a?b=1&x=2");
    assert_eq!(reserved, literal);

    let encoded = Template::parse("{base}{?x}").unwrap().expand(&bindings);
    assert_eq!(encoded, "%2Fa%3Fb%3D1?x=2");
}

#[test]
fn test_expansion_is_repeatable() {
    let template = Template::parse("/users{/username}{?query*}").unwrap();
    let bindings = Bindings::new()
        .with("username", "foobar")
        .with("query", vec![("b", "2"), ("a", "1")]);
    let first = template.expand(&bindings);
    assert_eq!(first, "/users/foobar?b=2&a=1");
    assert_eq!(template.expand(&bindings), first);
}

#[test]
fn test_syntax_errors_surface_at_parse() {
    let cases = [
        ("/users{/username", TemplateError::UnclosedExpression { position: 6 }),
        ("/users}", TemplateError::UnmatchedClose { position: 6 }),
        ("{}", TemplateError::EmptyVariableName { position: 1 }),
        (
            "{!x}",
            TemplateError::UnknownOperator {
                operator: '!',
                position: 1,
            },
        ),
    ];
    for (source, expected) in cases {
        assert_eq!(Template::parse(source), Err(expected), "template {source}");
    }
}
