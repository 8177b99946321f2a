//! Tests for value, section and rendering lambdas.

use stache::{Lambda, RenderError, Value, data, render};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

#[test]
fn value_lambda_interpolates() {
    let data = data! { "lambda" => Lambda::value(|| "world".to_string()) };
    assert_eq!(render("Hello, {{lambda}}!", &data).unwrap(), "Hello, world!");
}

#[test]
fn value_lambda_output_is_a_template() {
    let data = data! {
        "planet" => "world",
        "lambda" => Lambda::value(|| "{{planet}}".to_string()),
    };
    assert_eq!(render("Hello, {{lambda}}!", &data).unwrap(), "Hello, world!");
}

#[test]
fn value_lambda_output_uses_default_delimiters() {
    let data = data! {
        "planet" => "world",
        "lambda" => Lambda::value(|| "|planet| => {{planet}}".to_string()),
    };
    let output = render("{{= | | =}}\nHello, (|&lambda|)!", &data).unwrap();
    assert_eq!(output, "Hello, (|planet| => world)!");
}

#[test]
fn value_lambda_output_is_escaped() {
    let data = data! { "lambda" => Lambda::value(|| ">".to_string()) };
    assert_eq!(render("<{{lambda}}{{{lambda}}}", &data).unwrap(), "<&gt;>");
}

#[test]
fn value_lambda_called_per_tag() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let data = data! {
        "lambda" => Lambda::value(move || {
            (counter.fetch_add(1, Ordering::SeqCst) + 1).to_string()
        }),
    };
    assert_eq!(render("{{lambda}} == {{{lambda}}} == {{lambda}}", &data).unwrap(), "1 == 2 == 3");
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[test]
fn section_lambda_receives_raw_text() {
    let data = data! {
        "name" => "Willy",
        "lambda" => Lambda::section(|text| {
            if text == "{{x}}" { "yes".to_string() } else { "no".to_string() }
        }),
    };
    assert_eq!(render("<{{#lambda}}{{x}}{{/lambda}}>", &data).unwrap(), "<yes>");
}

#[test]
fn section_lambda_output_is_rendered() {
    let data = data! {
        "name" => "Willy",
        "bold" => Lambda::section(|text| format!("<b>{text}</b>")),
    };
    let output = render("{{#bold}}Hi {{name}}.{{/bold}}", &data).unwrap();
    assert_eq!(output, "<b>Hi Willy.</b>");
}

#[test]
fn section_lambda_output_uses_section_delimiters() {
    let data = data! {
        "planet" => "Earth",
        "lambda" => Lambda::section(|text| format!("{text}{{{{planet}}}} => |planet|{text}")),
    };
    let output = render("{{= | | =}}<|#lambda|-|/lambda|>", &data).unwrap();
    assert_eq!(output, "<-{{planet}} => Earth->");
}

#[test]
fn section_lambda_called_per_section() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let data = data! {
        "lambda" => Lambda::section(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            "__".to_string()
        }),
    };
    let output = render("{{#lambda}}FILE{{/lambda}} != {{#lambda}}LINE{{/lambda}}", &data).unwrap();
    assert_eq!(output, "__ != __");
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn section_lambda_in_interpolation_gets_empty_text() {
    let data = data! { "wrap" => Lambda::section(|text| format!("[{text}]")) };
    assert_eq!(render("{{wrap}}", &data).unwrap(), "[]");
}

#[test]
fn lambdas_are_truthy_for_inverted_sections() {
    let data = data! { "lambda" => Lambda::section(|_| "x".to_string()) };
    assert_eq!(render("<{{^lambda}}{{static}}{{/lambda}}>", &data).unwrap(), "<>");
}

#[test]
fn render_lambda_output_is_verbatim() {
    let data = data! {
        "name" => "Ana",
        "wrap" => Lambda::render(|text, renderer| {
            Ok(format!("{{{{{}}}}}", renderer.render(text)?))
        }),
    };
    let output = render("{{#wrap}}{{name}}{{/wrap}}", &data).unwrap();
    assert_eq!(output, "{{Ana}}");
}

#[test]
fn render_lambda_can_add_data() {
    let data = data! {
        "name" => "N",
        "wrap" => Lambda::render(|text, renderer| {
            let extra = data! { "extra" => "E" };
            renderer.render_with(text, &extra)
        }),
    };
    let output = render("{{#wrap}}{{extra}}-{{name}}{{/wrap}}|{{extra}}", &data).unwrap();
    assert_eq!(output, "E-N|");
}

#[test]
fn render_lambda_sees_section_context() {
    let data = data! {
        "people" => vec![data! { "name" => "a" }, data! { "name" => "b" }],
        "upper" => Lambda::render(|_, renderer| {
            Ok(renderer
                .context()
                .get("name")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_uppercase())
        }),
    };
    let output = render("{{#people}}{{#upper}}{{/upper}}{{/people}}", &data).unwrap();
    assert_eq!(output, "AB");
}

#[test]
fn render_lambda_keeps_section_delimiters() {
    let data = data! {
        "x" => 1,
        "lambda" => Lambda::render(|text, renderer| {
            assert_eq!(renderer.delimiters().open, "<%");
            renderer.render(text)
        }),
    };
    let output = render("{{=<% %>=}}<%#lambda%><%x%>{{x}}<%/lambda%>", &data).unwrap();
    assert_eq!(output, "1{{x}}");
}

#[test]
fn lambda_errors_propagate() {
    let data = data! {
        "bad" => Lambda::render(|_, renderer| renderer.render("{{#open}}")),
    };
    let err = render("{{#bad}}x{{/bad}}", &data).unwrap_err();
    assert!(matches!(err, RenderError::Parse(_)));
}

#[test]
fn recursive_lambda_hits_depth_limit() {
    let data = data! { "me" => Lambda::value(|| "{{me}}".to_string()) };
    let err = render("{{me}}", &data).unwrap_err();
    assert!(matches!(err, RenderError::MaxDepthExceeded { ref name, .. } if name == "me"));
}

#[test]
fn lambdas_compare_by_identity() {
    let lambda = Lambda::value(String::new);
    assert_eq!(lambda, lambda.clone());
    assert_ne!(lambda, Lambda::value(String::new));
}
