use crate::*;
use crate::{css, html, js};
use spa_core::{CompressionLevel, ContentType};

const LEVELS: [CompressionLevel; 3] = [
    CompressionLevel::Basic,
    CompressionLevel::Aggressive,
    CompressionLevel::Extreme,
];

const STYLESHEET: &str = r#"/* header */
body {
  margin: 0px;
  color: rgb(0, 0, 0);
  font-family: "Helvetica Neue", sans-serif;
}

.nav > li + li {
  padding: 0.5em 1em !important;
  background: url(img/bg.png) no-repeat;
}
"#;

const SCRIPT: &str = "// util
function add(a, b) {
  return a + b
}
const total = add(1, 2)
console.log(total)
";

const DOCUMENT: &str = r#"<!doctype   html>
<html>
  <head>
    <!-- page title -->
    <title>  Demo  </title>
    <style>
      body { margin: 0px; }
    </style>
  </head>
  <body>
    <div class="">
      <p id="intro">Hello   world</p>
    </div>
    <pre>  keep
   this  </pre>
    <script>
      const a = 1
      const b = 2
    </script>
  </body>
</html>
"#;

// ========== JS: comments and whitespace ==========

#[test]
fn test_js_strip_comments_keeps_literals() {
    let out = js::strip_comments("let a = \"//not\"; // real\n/* block */let b = 1;");
    assert!(out.contains("\"//not\""));
    assert!(!out.contains("real"));
    assert!(!out.contains("block"));
    assert!(out.contains("let b = 1;"));
}

#[test]
fn test_js_basic_keeps_lines() {
    let out = js::minify("// c\nlet a = 1;\n\n\n  let b = 2;", CompressionLevel::Basic);
    assert_eq!(out, "let a = 1;\nlet b = 2;");
}

#[test]
fn test_js_collapse_keeps_identifier_separation() {
    assert_eq!(js::collapse_whitespace("a\nb"), "a b");
    assert_eq!(js::collapse_whitespace("foo(\n1\n)"), "foo(1)");
    assert_eq!(js::collapse_whitespace("a +\n+b"), "a + +b");
}

#[test]
fn test_js_tighten_operators() {
    assert_eq!(js::tighten_operators("a + +b"), "a+ +b");
    assert_eq!(js::tighten_operators("foo(); bar()"), "foo(); bar()");
    assert_eq!(js::tighten_operators("foo();bar()"), "foo();bar()");
    assert_eq!(js::tighten_operators("x = { a : 1 , b : [ 2 ] }"), "x={a:1,b:[2]}");
}

#[test]
fn test_js_none_and_empty_untouched() {
    assert_eq!(js::minify("let  a = 1", CompressionLevel::None), "let  a = 1");
    assert_eq!(js::minify("   ", CompressionLevel::Extreme), "   ");
}

// ========== JS: semicolon insertion ==========

#[test]
fn test_js_asi_between_declarations() {
    let src = "const a = 1\nconst b = 2";
    assert_eq!(js::minify(src, CompressionLevel::Aggressive), "const a = 1;const b = 2");
    assert_eq!(js::minify(src, CompressionLevel::Extreme), "const a=1;const b=2");
}

#[test]
fn test_js_literal_preserved_through_asi() {
    let out = js::minify("const s = \"a; const b\"\nlet x = 1", CompressionLevel::Extreme);
    assert_eq!(out, "const s=\"a; const b\";let x=1");
}

#[test]
fn test_js_multiline_template_preserved() {
    let out = js::minify("const t = `a\n   b`\nlet c = 1", CompressionLevel::Extreme);
    assert!(out.contains("`a\n   b`"));
    assert!(out.ends_with(";let c=1"));
}

#[test]
fn test_js_constructor_call_not_split() {
    let out = js::minify("const io = new IntersectionObserver\n(callback)", CompressionLevel::Aggressive);
    assert_eq!(out, "const io = new IntersectionObserver(callback)");
}

#[test]
fn test_js_do_while_tail_not_split() {
    let out = js::minify("do {\nx++\n}\nwhile (x < 3)\nfoo()", CompressionLevel::Aggressive);
    assert!(!out.contains("};while"));
    assert!(out.contains("}while (x < 3);foo()"));
}

#[test]
fn test_js_else_continues_statement() {
    let out = js::insert_semicolons("if (a) {\nb()\n}\nelse {\nc()\n}");
    assert!(!out.contains("};\nelse"));
    assert!(out.contains("b()\n"));
}

#[test]
fn test_js_keyword_sweep_across_blank_lines() {
    let out = js::insert_semicolons("foo()\n\n\nreturn x");
    assert!(out.starts_with("foo();"));
}

#[test]
fn test_js_chained_calls_stay_chained() {
    let out = js::minify("fetch(url)\n.then(r => r.json())\n.catch(fail)", CompressionLevel::Aggressive);
    assert_eq!(out, "fetch(url).then(r => r.json()).catch(fail)");
}

#[test]
fn test_js_iife_opens_new_statement() {
    let out = js::insert_semicolons("foo()\n(function(){ run() })()");
    assert_eq!(out, "foo();\n(function(){ run() })()");

    let out = js::insert_semicolons("init()\n(async function() {})()");
    assert!(out.starts_with("init();\n(async function"));

    let out = js::insert_semicolons("a = b\n((x) => x)(1)");
    assert!(out.starts_with("a = b;\n(("));

    assert_eq!(js::insert_semicolons("foo\n(bar)"), "foo\n(bar)");
}

#[test]
fn test_js_foreach_call_not_split() {
    let src = "arr.forEach\n(function(x){ use(x) })";
    assert_eq!(js::insert_semicolons(src), src);
    assert_eq!(js::minify(src, CompressionLevel::Aggressive), "arr.forEach(function(x){ use(x) })");
}

#[test]
fn test_js_function_sample_extreme() {
    let out = js::minify(SCRIPT, CompressionLevel::Extreme);
    assert_eq!(out, "function add(a,b){return a+b};const total=add(1,2);console.log(total)");
}

#[test]
fn test_js_levels_monotonic() {
    let basic = js::minify(SCRIPT, CompressionLevel::Basic);
    let aggressive = js::minify(SCRIPT, CompressionLevel::Aggressive);
    let extreme = js::minify(SCRIPT, CompressionLevel::Extreme);
    assert!(basic.len() <= SCRIPT.len());
    assert!(aggressive.len() <= basic.len());
    assert!(extreme.len() <= aggressive.len());
}

// ========== CSS ==========

#[test]
fn test_css_rgb_and_zero_unit() {
    let out = css::minify("color: rgb(0,0,0); margin: 0px;", CompressionLevel::Aggressive);
    assert_eq!(out, "color:#000;margin:0;");
}

#[test]
fn test_css_basic_normalizes_declarations() {
    let src = "color: rgb(0,0,0); margin: 0px;";
    assert_eq!(css::minify(src, CompressionLevel::Basic), "color:#000;margin:0;");
    assert_eq!(minify(src, ContentType::Css, CompressionLevel::Auto), "color:#000;margin:0;");

    let out = css::minify(".a > .b {\n  color: red; /* c */\n}\n", CompressionLevel::Basic);
    assert_eq!(out, ".a > .b{color:red}");
}

#[test]
fn test_css_stylesheet_aggressive() {
    let out = css::minify(STYLESHEET, CompressionLevel::Aggressive);
    assert_eq!(
        out,
        r#"body{margin:0;color:#000;font-family:"Helvetica Neue",sans-serif}.nav > li + li{padding:.5em 1em!important;background:url(img/bg.png) no-repeat}"#
    );
}

#[test]
fn test_css_stylesheet_extreme_tightens_combinators() {
    let out = css::minify(STYLESHEET, CompressionLevel::Extreme);
    assert!(out.contains("}.nav>li+li{"));
}

#[test]
fn test_css_strings_untouched() {
    let out = css::minify(r#"a::before { content: "  x  ;  y "; }"#, CompressionLevel::Extreme);
    assert_eq!(out, r#"a::before{content:"  x  ;  y "}"#);
}

#[test]
fn test_css_url_untouched() {
    let out = css::minify(".b { background: url(data:image/png;base64,AA  BB) ; }", CompressionLevel::Aggressive);
    assert_eq!(out, ".b{background:url(data:image/png;base64,AA  BB)}");
}

#[test]
fn test_css_number_rules() {
    let out = css::minify(
        "transition: opacity 0s; width: 0.50em; margin: -0.0px 0% 0;",
        CompressionLevel::Aggressive,
    );
    assert_eq!(out, "transition:opacity 0s;width:.50em;margin:0 0% 0;");
}

#[test]
fn test_css_colors() {
    assert_eq!(css::shorten_colors("rgb(255,0,128)"), "#ff0080");
    assert_eq!(css::shorten_colors("rgb(17, 34, 51)"), "#123");
    assert_eq!(css::shorten_colors("rgb(300,0,0)"), "rgb(300,0,0)");
}

#[test]
fn test_css_calc_keeps_operator_spaces() {
    let out = css::minify(".a > .b { width: calc(1px + 2px) }", CompressionLevel::Extreme);
    assert_eq!(out, ".a>.b{width:calc(1px + 2px)}");
}

#[test]
fn test_css_idempotent_every_level() {
    for level in LEVELS {
        let once = css::minify(STYLESHEET, level);
        assert_eq!(css::minify(&once, level), once, "level {level}");
    }
}

#[test]
fn test_css_levels_monotonic() {
    let basic = css::minify(STYLESHEET, CompressionLevel::Basic);
    let aggressive = css::minify(STYLESHEET, CompressionLevel::Aggressive);
    let extreme = css::minify(STYLESHEET, CompressionLevel::Extreme);
    assert!(aggressive.len() <= basic.len());
    assert!(extreme.len() <= aggressive.len());
}

// ========== HTML ==========

#[test]
fn test_html_basic() {
    let out = html::minify(DOCUMENT, CompressionLevel::Basic);
    assert!(!out.contains("page title"));
    assert!(out.contains("Hello world"));
    assert!(out.contains("<style>\nbody { margin: 0px; }\n</style>"));
    assert!(out.contains("<script>\nconst a = 1\nconst b = 2\n</script>"));
    assert!(out.contains("<div class=\"\">"));
}

#[test]
fn test_html_aggressive() {
    let out = html::minify(DOCUMENT, CompressionLevel::Aggressive);
    assert!(out.contains("<style>body{margin:0}</style>"));
    assert!(out.contains("<script>const a = 1;const b = 2</script>"));
    assert!(out.contains("<p id=intro>Hello world</p>"));
    assert!(!out.contains("class=\"\""));
}

#[test]
fn test_html_extreme() {
    let out = html::minify(DOCUMENT, CompressionLevel::Extreme);
    assert!(out.starts_with("<!DOCTYPE html>"));
    assert!(out.contains("<script>const a=1;const b=2</script>"));
    assert!(out.contains("<pre>  keep\n   this  </pre>"));
}

#[test]
fn test_html_pre_integrity_at_extreme() {
    let src = "<div>\n  <PRE class=\"x\">  a\n\n    b  </PRE>\n  <textarea>  t  </textarea>\n</div>";
    let out = html::minify(src, CompressionLevel::Extreme);
    assert!(out.contains("<PRE class=\"x\">  a\n\n    b  </PRE>"));
    assert!(out.contains("<textarea>  t  </textarea>"));
}

#[test]
fn test_html_code_and_xmp_preserved() {
    let src = "<div>\n  <code>  a   b  </code>\n  <XMP> <b>  x </b>\n </XMP>\n</div>";
    for level in LEVELS {
        let out = html::minify(src, level);
        assert!(out.contains("<code>  a   b  </code>"), "level {level}");
        assert!(out.contains("<XMP> <b>  x </b>\n </XMP>"), "level {level}");
    }
}

#[test]
fn test_html_conditional_comments_kept() {
    let src = "<!-- drop --><!--[if IE]><p>old</p><![endif]--><!--> keep -->";
    let out = html::strip_comments(src);
    assert!(!out.contains("drop"));
    assert!(out.contains("<!--[if IE]><p>old</p><![endif]-->"));
    assert!(out.contains("<!--> keep -->"));
}

#[test]
fn test_html_non_js_script_untouched() {
    let src = "<div>\n<script type=\"application/json\">{ \"a\" : 1 }</script>\n<script src=\"app.js\"></script>\n</div>";
    let out = html::minify(src, CompressionLevel::Extreme);
    assert!(out.contains("<script type=\"application/json\">{ \"a\" : 1 }</script>"));
    assert!(out.contains("<script src=\"app.js\"></script>"));
}

#[test]
fn test_html_attribute_rewriting() {
    let out = html::minify("<img alt=\"a b\" class=\"\"><input type=\"text\" />", CompressionLevel::Aggressive);
    assert_eq!(out, "<img alt=\"a b\"><input type=\"text\" />");

    let out = html::minify("<input type=\"text\" />", CompressionLevel::Extreme);
    assert_eq!(out, "<input type=\"text\"/>");
}

#[test]
fn test_html_attribute_text_inside_quotes_untouched() {
    for level in [CompressionLevel::Aggressive, CompressionLevel::Extreme] {
        let src = "<div title='a b=\"c\"'>x</div>";
        assert_eq!(html::minify(src, level), src, "level {level}");

        let src = "<div title='x class=\"\" y'>x</div>";
        assert_eq!(html::minify(src, level), src, "level {level}");
    }

    let out = html::minify("<p title=\"a b\" id=\"intro\">x</p>", CompressionLevel::Aggressive);
    assert_eq!(out, "<p title=\"a b\" id=intro>x</p>");
}

#[test]
fn test_html_none_and_empty_untouched() {
    assert_eq!(html::minify(DOCUMENT, CompressionLevel::None), DOCUMENT);
    assert_eq!(html::minify("", CompressionLevel::Extreme), "");
}

#[test]
fn test_html_idempotent_every_level() {
    for level in LEVELS {
        let once = html::minify(DOCUMENT, level);
        assert_eq!(html::minify(&once, level), once, "level {level}");
    }
}

#[test]
fn test_html_levels_monotonic() {
    let basic = html::minify(DOCUMENT, CompressionLevel::Basic);
    let aggressive = html::minify(DOCUMENT, CompressionLevel::Aggressive);
    let extreme = html::minify(DOCUMENT, CompressionLevel::Extreme);
    assert!(basic.len() <= DOCUMENT.len());
    assert!(aggressive.len() <= basic.len());
    assert!(extreme.len() <= aggressive.len());
}

// ========== Minifier ==========

#[test]
fn test_minifier_resolves_auto() {
    let result = Minifier::default().minify("<p> a </p>", ContentType::Html);
    assert_eq!(result.level, CompressionLevel::Basic);
    assert_eq!(result.passes_applied, vec!["html".to_string()]);

    let big = "x".repeat(20_000);
    let result = Minifier::default().minify(&big, ContentType::Js);
    assert_eq!(result.level, CompressionLevel::Extreme);
}

#[test]
fn test_minifier_json_passthrough() {
    let body = r#"{ "a" : 1 }"#;
    let result = Minifier::extreme().minify(body, ContentType::Json);
    assert_eq!(result.output, body);
    assert!(result.passes_applied.is_empty());
    assert_eq!(result.ratio(), 1.0);
}

#[test]
fn test_minifier_none_is_identity() {
    assert_eq!(minify(STYLESHEET, ContentType::Css, CompressionLevel::None), STYLESHEET);
}

#[test]
fn test_minifier_stats() {
    let result = Minifier::aggressive().minify(STYLESHEET, ContentType::Css);
    assert_eq!(result.original_len, STYLESHEET.len());
    assert_eq!(result.minified_len, result.output.len());
    assert!(result.ratio() < 1.0);
    assert!(result.reduction_pct > 0.0);
}

#[test]
fn test_minifier_empty_input() {
    let result = Minifier::basic().minify("", ContentType::Html);
    assert_eq!(result.output, "");
    assert_eq!(result.ratio(), 1.0);
}
