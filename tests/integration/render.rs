//! Rendering through the public API against files on disk.

use serde_json::json;
use stencil::config::StencilConfig;
use stencil::path::{PathResolver, Separator};
use stencil::templating::{SharedValue, TemplateError, TemplateRenderer, output};
use stencil::test_utils::{TemplateDir, init_test_logging};

#[test]
fn test_layout_with_nested_partials() {
    init_test_logging(None);
    let dir = TemplateDir::new().unwrap();
    dir.write("partials/nav.html", "<nav>{% for l in links %}[{{ l }}]{% endfor %}</nav>").unwrap();
    dir.write("partials/footer.html", "<footer>{{ year }}</footer>").unwrap();
    dir.write(
        "layout.html",
        "<html>{{ style_includes() }}{{ nav }}<h1>{{ title }}</h1>{{ footer }}{{ script_includes() }}</html>",
    )
    .unwrap();

    let mut footer = TemplateRenderer::new("partials/footer.html").with_root(dir.root());
    footer.set_variable("year", 2024);

    let mut nav = TemplateRenderer::new("partials/nav.html").with_root(dir.root());
    nav.set_variable("links", json!(["home", "about"]));
    nav.set_template("unused", footer);

    let mut page = TemplateRenderer::new("layout.html").with_root(dir.root());
    page.set_variable("title", "Welcome");
    page.set_template("nav", nav);
    page.set_template(
        "footer",
        TemplateRenderer::new("partials/./footer.html").with_root(dir.root()),
    );
    page.variables_mut().insert("unused", json!(null));
    page.add_style_include("site.css");
    page.add_script_include("app.js");

    // The footer bound directly on the page has no `year` binding.
    let error = page.render_to_string().unwrap_err();
    assert!(matches!(error, TemplateError::NestedRender { ref key, .. } if key == "footer"));
    assert_eq!(output::depth(), 0);

    // Bindings are rendered in key order, so `nav` was never reached.
    assert!(page.variable("nav").is_none());

    let mut footer = TemplateRenderer::new("partials/footer.html").with_root(dir.root());
    footer.set_variable("year", 2025);
    page.set_template("footer", footer);

    let html = page.render_to_string().unwrap();
    assert_eq!(page.variable("nav"), Some(json!("<nav>[home][about]</nav>")));
    assert_eq!(
        html,
        "<html><link rel=\"stylesheet\" type=\"text/css\" href=\"site.css\">\n\
         <nav>[home][about]</nav><h1>Welcome</h1><footer>2025</footer>\
         <script src=\"app.js\"></script>\n</html>"
    );
}

#[test]
fn test_shared_counter_across_renders() {
    let dir = TemplateDir::new().unwrap();
    let file = dir
        .write("counter.txt", r#"{{ hits }}{{ assign(name="hits", value=hits + 1) }}"#)
        .unwrap();

    let hits = SharedValue::new(json!(0));
    let mut first = TemplateRenderer::new(file.as_str());
    let mut second = TemplateRenderer::new(file.as_str());
    first.set_variable_by_reference("hits", &hits);
    second.set_variable_by_reference("hits", &hits);

    assert_eq!(first.render_to_string().unwrap(), "0");
    assert_eq!(second.render_to_string().unwrap(), "1");
    assert_eq!(first.render_to_string().unwrap(), "2");
    assert_eq!(hits.get(), json!(3));
}

#[test]
fn test_caller_mutation_after_binding_is_visible() {
    let dir = TemplateDir::new().unwrap();
    let file = dir.write("list.txt", "{{ items | join(sep=\" \") }}").unwrap();

    let items = SharedValue::new(json!(["a"]));
    let mut renderer = TemplateRenderer::new(file);
    renderer.set_variable_by_reference("items", &items);

    items.update(|v| {
        if let Some(list) = v.as_array_mut() {
            list.push(json!("b"));
        }
    });

    assert_eq!(renderer.render_to_string().unwrap(), "a b");
}

#[test]
fn test_missing_template_inside_outer_capture() {
    let dir = TemplateDir::new().unwrap();
    let mut renderer = TemplateRenderer::new("nowhere/../missing.html").with_root(dir.root());

    let outer = output::capture();
    output::emit("before|").unwrap();
    assert!(matches!(renderer.render_to_string(), Err(TemplateError::FileNotFound { .. })));
    output::emit("after").unwrap();

    assert_eq!(outer.finish(), "before|after");
    assert_eq!(output::depth(), 0);
}

#[test]
fn test_message_lists_render_in_template() {
    let dir = TemplateDir::new().unwrap();
    let file = dir
        .write(
            "flash.txt",
            "{% for m in info_messages() %}i:{{ m }};{% endfor %}\
             {% for m in error_messages() %}e:{{ m }};{% endfor %}",
        )
        .unwrap();

    let mut renderer = TemplateRenderer::new(file);
    renderer.add_info_message("saved");
    renderer.add_error_message("quota");
    renderer.add_info_message("synced");

    assert_eq!(renderer.render_to_string().unwrap(), "i:saved;i:synced;e:quota;");
    assert_eq!(renderer.info_messages(), ["saved", "synced"]);
}

#[test]
fn test_resolver_properties() {
    let resolver = PathResolver::new(Separator::Slash);

    assert_eq!(resolver.resolve(["a", "./b", "c"]), "a/b/c");
    assert_eq!(resolver.resolve("a/b/../c"), "a/c");
    assert_eq!(resolver.resolve("a/b/../../c"), "c");
    assert_eq!(resolver.resolve("a//b///c/"), "a/b/c");

    // Without `..` segments or a trailing separator there is nothing left to fold.
    for path in ["a/b/c", "/srv/www/index.html", "x\\y//z", "./rel/./p"] {
        assert_eq!(resolver.resolve(path), resolver.normalize(path));
    }

    assert_eq!(resolver.normalize("a/b/"), "a/b/");
    assert_eq!(resolver.resolve("a/b/"), "a/b");
    assert_eq!(resolver.resolve("a/b//"), "a/b");
}

#[test]
fn test_autoescaped_layout_keeps_partial_markup() {
    let dir = TemplateDir::new().unwrap();
    dir.write("partials/nav.html", "<nav>{{ label }}</nav>").unwrap();
    dir.write("page.html", "{{ nav }}<h1>{{ title }}</h1>").unwrap();

    let config = StencilConfig {
        template_root: Some(dir.root()),
        separator: Separator::Slash,
        autoescape: true,
    };

    let mut nav = TemplateRenderer::from_config("partials/nav.html", &config);
    nav.set_variable("label", "A & B");

    let mut page = TemplateRenderer::from_config("page.html", &config);
    page.set_template("nav", nav);
    page.set_variable("title", "<script>");

    assert_eq!(
        page.render_to_string().unwrap(),
        "<nav>A &amp; B</nav><h1>&lt;script&gt;</h1>"
    );
}
