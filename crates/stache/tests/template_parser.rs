//! Integration tests for template parsing.

use stache::parser::{
    Delimiters, Node, Section, Span, TagKind, Template, next_tag, parse_template,
    parse_with_delimiters,
};

fn literal(text: &str) -> Node {
    Node::Literal(text.to_string())
}

fn var(key: &str) -> Node {
    Node::Interpolation {
        key: key.to_string(),
        escaped: true,
    }
}

fn section(template: &Template) -> &Section {
    template
        .nodes
        .iter()
        .find_map(|node| match node {
            Node::Section(s) => Some(s),
            _ => None,
        })
        .expect("template has a section")
}

#[test]
fn test_literal_only() {
    let template = parse_template("Just text, no tags.").unwrap();
    assert_eq!(template.nodes, vec![literal("Just text, no tags.")]);
}

#[test]
fn test_empty_template() {
    assert!(parse_template("").unwrap().nodes.is_empty());
}

#[test]
fn test_interpolation() {
    let template = parse_template("Hello {{name}}!").unwrap();
    assert_eq!(
        template.nodes,
        vec![literal("Hello "), var("name"), literal("!")]
    );
}

#[test]
fn test_unescaped_forms() {
    let template = parse_template("{{{a}}} {{&b}}").unwrap();
    assert_eq!(
        template.nodes,
        vec![
            Node::Interpolation {
                key: "a".to_string(),
                escaped: false
            },
            literal(" "),
            Node::Interpolation {
                key: "b".to_string(),
                escaped: false
            },
        ]
    );
}

#[test]
fn test_whitespace_inside_tags_is_ignored() {
    let template = parse_template("{{ name }}{{& raw }}{{# list }}x{{/ list }}").unwrap();
    assert_eq!(template.nodes[0], var("name"));
    assert_eq!(
        template.nodes[1],
        Node::Interpolation {
            key: "raw".to_string(),
            escaped: false
        }
    );
    assert_eq!(section(&template).key, "list");
}

#[test]
fn test_dotted_keys_are_kept_whole() {
    let template = parse_template("{{person.name.first}}").unwrap();
    assert_eq!(template.nodes, vec![var("person.name.first")]);
}

#[test]
fn test_section_body_and_raw_text() {
    let template = parse_template("{{#items}}\n- {{.}}\n{{/items}}\n").unwrap();
    assert_eq!(template.nodes.len(), 1);

    let section = section(&template);
    assert_eq!(section.key, "items");
    assert!(!section.inverted);
    assert_eq!(section.body, vec![literal("- "), var("."), literal("\n")]);
    assert_eq!(section.raw, "- {{.}}\n");
    assert!(section.delimiters.is_default());
}

#[test]
fn test_inverted_section() {
    let template = parse_template("{{^empty}}none{{/empty}}").unwrap();
    let section = section(&template);
    assert!(section.inverted);
    assert_eq!(section.body, vec![literal("none")]);
    assert_eq!(section.raw, "none");
}

#[test]
fn test_nested_sections() {
    let template = parse_template("{{#a}}{{#b}}x{{/b}}{{/a}}").unwrap();
    let outer = section(&template);
    assert_eq!(outer.key, "a");
    assert_eq!(outer.raw, "{{#b}}x{{/b}}");
    match &outer.body[..] {
        [Node::Section(inner)] => {
            assert_eq!(inner.key, "b");
            assert_eq!(inner.body, vec![literal("x")]);
        }
        other => panic!("expected one nested section, got {other:?}"),
    }
}

#[test]
fn test_same_key_nested() {
    let template = parse_template("{{#a}}1{{#a}}2{{/a}}3{{/a}}").unwrap();
    let outer = section(&template);
    assert_eq!(outer.raw, "1{{#a}}2{{/a}}3");
    assert_eq!(outer.body.len(), 3);
}

#[test]
fn test_comment_inline() {
    let template = parse_template("a{{! note }}b").unwrap();
    assert_eq!(template.nodes, vec![literal("a"), Node::Comment, literal("b")]);
}

#[test]
fn test_standalone_comment_line_is_removed() {
    let template = parse_template("a\n  {{! note }}\nb").unwrap();
    assert_eq!(
        template.nodes,
        vec![literal("a\n"), Node::Comment, literal("b")]
    );
}

#[test]
fn test_standalone_interpolation_is_not_trimmed() {
    let template = parse_template("  {{x}}\n").unwrap();
    assert_eq!(template.nodes, vec![literal("  "), var("x"), literal("\n")]);
}

#[test]
fn test_partial_tags() {
    let template = parse_template("a {{>box}}").unwrap();
    assert_eq!(
        template.nodes,
        vec![
            literal("a "),
            Node::Partial {
                key: "box".to_string(),
                dynamic: false,
                indent: String::new(),
            },
        ]
    );
}

#[test]
fn test_standalone_partial_captures_indent() {
    let template = parse_template("  {{>box}}\n").unwrap();
    assert_eq!(
        template.nodes,
        vec![Node::Partial {
            key: "box".to_string(),
            dynamic: false,
            indent: "  ".to_string(),
        }]
    );
}

#[test]
fn test_dynamic_partial_forms() {
    for source in ["{{>*name}}", "{{> * name }}", "{{*name}}"] {
        let template = parse_template(source).unwrap();
        assert_eq!(
            template.nodes,
            vec![Node::Partial {
                key: "name".to_string(),
                dynamic: true,
                indent: String::new(),
            }],
            "{source}"
        );
    }
}

#[test]
fn test_delimiter_change() {
    let template = parse_template("{{=<% %>=}}<%x%> {{y}}").unwrap();
    assert_eq!(
        template.nodes,
        vec![
            Node::DelimiterChange(Delimiters::new("<%", "%>")),
            var("x"),
            literal(" {{y}}"),
        ]
    );
}

#[test]
fn test_section_records_active_delimiters() {
    let template = parse_template("{{=<% %>=}}<%#a%><%b%><%/a%>").unwrap();
    let section = section(&template);
    assert_eq!(section.delimiters, Delimiters::new("<%", "%>"));
    assert_eq!(section.raw, "<%b%>");
}

#[test]
fn test_delimiter_change_outlives_section() {
    let template = parse_template("{{#a}}{{=<% %>=}}<%/a%><%b%>{{c}}").unwrap();
    assert_eq!(template.nodes.len(), 3);
    assert_eq!(
        section(&template).body,
        vec![Node::DelimiterChange(Delimiters::new("<%", "%>"))]
    );
    assert_eq!(template.nodes[1], var("b"));
    assert_eq!(template.nodes[2], literal("{{c}}"));
}

#[test]
fn test_custom_starting_delimiters() {
    let delimiters = Delimiters::new("<%", "%>");
    let template = parse_with_delimiters("<%x%> <%{y}%> {{z}}", &delimiters).unwrap();
    assert_eq!(
        template.nodes,
        vec![
            var("x"),
            literal(" "),
            Node::Interpolation {
                key: "y".to_string(),
                escaped: false
            },
            literal(" {{z}}"),
        ]
    );
}

#[test]
fn test_parse_is_repeatable() {
    let source = "{{#a}}\n{{b}}\n{{/a}}\n{{>p}}";
    assert_eq!(parse_template(source).unwrap(), parse_template(source).unwrap());
}

#[test]
fn test_next_tag_inline() {
    let tag = next_tag("ab {{#x}}\n", &Delimiters::default(), 0)
        .unwrap()
        .unwrap();
    assert_eq!(tag.kind, TagKind::Section);
    assert_eq!(tag.key, "x");
    assert_eq!(tag.token, Span::new(3, 9));
    assert_eq!(tag.span, tag.token);
    assert!(!tag.standalone);
}

#[test]
fn test_next_tag_standalone_widens_span() {
    let source = "  {{#x}}\nrest";
    let tag = next_tag(source, &Delimiters::default(), 0).unwrap().unwrap();
    assert!(tag.standalone);
    assert_eq!(tag.token, Span::new(2, 8));
    assert_eq!(tag.span, Span::new(0, 9));
    assert_eq!(tag.indent, "  ");
}

#[test]
fn test_next_tag_crlf_standalone() {
    let source = "|\r\n{{!x}}\r\n|";
    let tag = next_tag(source, &Delimiters::default(), 0).unwrap().unwrap();
    assert!(tag.standalone);
    assert_eq!(tag.span.slice(source), "{{!x}}\r\n");
}

#[test]
fn test_next_tag_none_for_plain_text() {
    assert!(next_tag("plain", &Delimiters::default(), 0).unwrap().is_none());
    assert!(next_tag("{{a}} tail", &Delimiters::default(), 5).unwrap().is_none());
}

#[test]
fn test_next_tag_set_delimiters() {
    let tag = next_tag("{{= | | =}}", &Delimiters::default(), 0)
        .unwrap()
        .unwrap();
    assert_eq!(tag.kind, TagKind::SetDelimiters(Delimiters::new("|", "|")));
    assert!(tag.key.is_empty());
}
