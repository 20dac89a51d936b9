//! Expression library.
//!
//! Every builder returns an [`Expression`] bound to a remote node. Wait
//! templates return `true` once their predicate holds and `null` otherwise, so
//! a poller can tell "satisfied" from "not yet" without decoding payloads.

use domdriver_core_types::{QuerySelector, RemoteObjectId, ScrollOptions, Value, WaitEvent};
use serde_json::{json, Map};

use crate::expression::Expression;

const SELECTOR_HELPERS: &str = r#"
  const __one = (root, sel) => {
    if (sel.kind === 'xpath') {
      const doc = root.ownerDocument || root;
      return doc.evaluate(sel.value, root, null, XPathResult.FIRST_ORDERED_NODE_TYPE, null).singleNodeValue;
    }
    return root.querySelector(sel.value);
  };
  const __all = (root, sel) => {
    if (sel.kind === 'xpath') {
      const doc = root.ownerDocument || root;
      const snap = doc.evaluate(sel.value, root, null, XPathResult.ORDERED_NODE_SNAPSHOT_TYPE, null);
      const out = [];
      for (let i = 0; i < snap.snapshotLength; i++) { out.push(snap.snapshotItem(i)); }
      return out;
    }
    return Array.from(root.querySelectorAll(sel.value));
  };
"#;

fn function(params: &str, body: &str, selectors: bool) -> String {
    let mut out = String::with_capacity(body.len() + 64);
    out.push_str("function(");
    out.push_str(params);
    out.push_str(") {");
    if selectors {
        out.push_str(SELECTOR_HELPERS);
    }
    out.push_str(body);
    out.push_str("\n}");
    out
}

fn on(id: &RemoteObjectId, name: &'static str, params: &str, body: &str, args: Vec<Value>) -> Expression {
    Expression::new(name, function(params, body, false), Some(id.clone()), args)
}

fn on_selector(
    id: &RemoteObjectId,
    name: &'static str,
    selector: &QuerySelector,
    params: &str,
    body: &str,
    mut args: Vec<Value>,
) -> Expression {
    let mut all = String::from("sel");
    if !params.is_empty() {
        all.push_str(", ");
        all.push_str(params);
    }
    args.insert(0, selector_arg(selector));
    Expression::new(name, function(&all, body, true), Some(id.clone()), args)
}

fn global(name: &'static str, params: &str, body: &str, args: Vec<Value>) -> Expression {
    Expression::new(name, function(params, body, false), None, args)
}

fn selector_arg(selector: &QuerySelector) -> Value {
    json!({ "kind": selector.kind, "value": selector.value })
}

fn expect_arg(when: WaitEvent) -> Value {
    Value::Bool(when.is_exists())
}

// ---------------------------------------------------------------------------
// Wait conditions
// ---------------------------------------------------------------------------

const CLASS_PREDICATE: &str = "const check = (el) => el.classList.contains(name) === expect;";

const ATTRIBUTE_PREDICATE: &str = r#"
  const matches = (el) => {
    const actual = el.getAttribute(name);
    if (expected === null) { return actual !== null; }
    if (typeof expected === 'boolean') { return (actual !== null) === expected; }
    return actual !== null && actual === String(expected);
  };
  const check = (el) => matches(el) === expect;"#;

const STYLE_PREDICATE: &str = r#"
  const matches = (el) => {
    const computed = window.getComputedStyle(el);
    const actual = computed.getPropertyValue(name) || computed[name] || '';
    if (expected === null) { return actual !== ''; }
    return String(actual) === String(expected);
  };
  const check = (el) => matches(el) === expect;"#;

const OWN_CHECK: &str = "\n  return check(this) ? true : null;";

const ONE_CHECK: &str = r#"
  const el = __one(this, sel);
  if (!el) { return null; }
  return check(el) ? true : null;"#;

const ALL_CHECK: &str = r#"
  const els = __all(this, sel);
  if (els.length === 0) { return null; }
  return els.every(check) ? true : null;"#;

fn predicate_body(predicate: &str, check: &str) -> String {
    let mut body = String::from("\n  ");
    body.push_str(predicate);
    body.push_str(check);
    body
}

/// Handle itself attached to (`Exists`) or detached from (`NotExists`) the document.
pub fn wait_for_connected(id: &RemoteObjectId, when: WaitEvent) -> Expression {
    on(
        id,
        "wait_for_connected",
        "expect",
        "\n  return this.isConnected === expect ? true : null;",
        vec![expect_arg(when)],
    )
}

pub fn wait_for_element(id: &RemoteObjectId, selector: &QuerySelector, when: WaitEvent) -> Expression {
    on_selector(
        id,
        "wait_for_element",
        selector,
        "expect",
        "\n  return (__one(this, sel) !== null) === expect ? true : null;",
        vec![expect_arg(when)],
    )
}

/// `Exists`: at least one match. `NotExists`: no match at all.
pub fn wait_for_element_all(
    id: &RemoteObjectId,
    selector: &QuerySelector,
    when: WaitEvent,
) -> Expression {
    on_selector(
        id,
        "wait_for_element_all",
        selector,
        "expect",
        r#"
  const count = __all(this, sel).length;
  return (expect ? count > 0 : count === 0) ? true : null;"#,
        vec![expect_arg(when)],
    )
}

pub fn wait_for_class(id: &RemoteObjectId, class: &str, when: WaitEvent) -> Expression {
    on(
        id,
        "wait_for_class",
        "name, expect",
        &predicate_body(CLASS_PREDICATE, OWN_CHECK),
        vec![json!(class), expect_arg(when)],
    )
}

pub fn wait_for_class_by_selector(
    id: &RemoteObjectId,
    selector: &QuerySelector,
    class: &str,
    when: WaitEvent,
) -> Expression {
    on_selector(
        id,
        "wait_for_class_by_selector",
        selector,
        "name, expect",
        &predicate_body(CLASS_PREDICATE, ONE_CHECK),
        vec![json!(class), expect_arg(when)],
    )
}

pub fn wait_for_class_by_selector_all(
    id: &RemoteObjectId,
    selector: &QuerySelector,
    class: &str,
    when: WaitEvent,
) -> Expression {
    on_selector(
        id,
        "wait_for_class_by_selector_all",
        selector,
        "name, expect",
        &predicate_body(CLASS_PREDICATE, ALL_CHECK),
        vec![json!(class), expect_arg(when)],
    )
}

pub fn wait_for_attribute(
    id: &RemoteObjectId,
    name: &str,
    value: &Value,
    when: WaitEvent,
) -> Expression {
    on(
        id,
        "wait_for_attribute",
        "name, expected, expect",
        &predicate_body(ATTRIBUTE_PREDICATE, OWN_CHECK),
        vec![json!(name), value.clone(), expect_arg(when)],
    )
}

pub fn wait_for_attribute_by_selector(
    id: &RemoteObjectId,
    selector: &QuerySelector,
    name: &str,
    value: &Value,
    when: WaitEvent,
) -> Expression {
    on_selector(
        id,
        "wait_for_attribute_by_selector",
        selector,
        "name, expected, expect",
        &predicate_body(ATTRIBUTE_PREDICATE, ONE_CHECK),
        vec![json!(name), value.clone(), expect_arg(when)],
    )
}

pub fn wait_for_attribute_by_selector_all(
    id: &RemoteObjectId,
    selector: &QuerySelector,
    name: &str,
    value: &Value,
    when: WaitEvent,
) -> Expression {
    on_selector(
        id,
        "wait_for_attribute_by_selector_all",
        selector,
        "name, expected, expect",
        &predicate_body(ATTRIBUTE_PREDICATE, ALL_CHECK),
        vec![json!(name), value.clone(), expect_arg(when)],
    )
}

pub fn wait_for_style(id: &RemoteObjectId, name: &str, value: &Value, when: WaitEvent) -> Expression {
    on(
        id,
        "wait_for_style",
        "name, expected, expect",
        &predicate_body(STYLE_PREDICATE, OWN_CHECK),
        vec![json!(name), value.clone(), expect_arg(when)],
    )
}

pub fn wait_for_style_by_selector(
    id: &RemoteObjectId,
    selector: &QuerySelector,
    name: &str,
    value: &Value,
    when: WaitEvent,
) -> Expression {
    on_selector(
        id,
        "wait_for_style_by_selector",
        selector,
        "name, expected, expect",
        &predicate_body(STYLE_PREDICATE, ONE_CHECK),
        vec![json!(name), value.clone(), expect_arg(when)],
    )
}

pub fn wait_for_style_by_selector_all(
    id: &RemoteObjectId,
    selector: &QuerySelector,
    name: &str,
    value: &Value,
    when: WaitEvent,
) -> Expression {
    on_selector(
        id,
        "wait_for_style_by_selector_all",
        selector,
        "name, expected, expect",
        &predicate_body(STYLE_PREDICATE, ALL_CHECK),
        vec![json!(name), value.clone(), expect_arg(when)],
    )
}

// ---------------------------------------------------------------------------
// Accessors
// ---------------------------------------------------------------------------

pub fn get_value(id: &RemoteObjectId) -> Expression {
    on(id, "get_value", "", "\n  return this.value;", vec![])
}

pub fn set_value(id: &RemoteObjectId, value: &Value) -> Expression {
    on(
        id,
        "set_value",
        "value",
        "\n  this.value = value;",
        vec![value.clone()],
    )
}

pub fn get_node_type(id: &RemoteObjectId) -> Expression {
    on(id, "get_node_type", "", "\n  return this.nodeType;", vec![])
}

pub fn get_node_name(id: &RemoteObjectId) -> Expression {
    on(id, "get_node_name", "", "\n  return this.nodeName;", vec![])
}

pub fn get_children_count(id: &RemoteObjectId) -> Expression {
    on(
        id,
        "get_children_count",
        "",
        "\n  return this.children ? this.children.length : 0;",
        vec![],
    )
}

/// Inline declarations only, keyed by property name.
pub fn get_styles(id: &RemoteObjectId) -> Expression {
    on(
        id,
        "get_styles",
        "",
        r#"
  const out = {};
  for (let i = 0; i < this.style.length; i++) {
    const prop = this.style[i];
    out[prop] = this.style.getPropertyValue(prop);
  }
  return out;"#,
        vec![],
    )
}

/// Inline value when declared, computed value otherwise.
pub fn get_style(id: &RemoteObjectId, name: &str) -> Expression {
    on(
        id,
        "get_style",
        "name",
        r#"
  const inline = this.style.getPropertyValue(name);
  if (inline !== '') { return inline; }
  const computed = window.getComputedStyle(this);
  const value = computed.getPropertyValue(name) || computed[name];
  return value === undefined || value === '' ? null : value;"#,
        vec![json!(name)],
    )
}

pub fn set_styles(id: &RemoteObjectId, styles: &Map<String, Value>) -> Expression {
    on(
        id,
        "set_styles",
        "styles",
        r#"
  Object.entries(styles).forEach(([prop, value]) => this.style.setProperty(prop, String(value)));"#,
        vec![Value::Object(styles.clone())],
    )
}

pub fn set_style(id: &RemoteObjectId, name: &str, value: &str) -> Expression {
    on(
        id,
        "set_style",
        "name, value",
        "\n  this.style.setProperty(name, value);",
        vec![json!(name), json!(value)],
    )
}

pub fn remove_styles(id: &RemoteObjectId, names: &[String]) -> Expression {
    on(
        id,
        "remove_styles",
        "names",
        "\n  names.forEach((prop) => this.style.removeProperty(prop));",
        vec![json!(names)],
    )
}

pub fn get_attributes(id: &RemoteObjectId) -> Expression {
    on(
        id,
        "get_attributes",
        "",
        r#"
  const out = {};
  for (const attr of Array.from(this.attributes || [])) { out[attr.name] = attr.value; }
  return out;"#,
        vec![],
    )
}

pub fn get_attribute(id: &RemoteObjectId, name: &str) -> Expression {
    on(
        id,
        "get_attribute",
        "name",
        "\n  return this.getAttribute(name);",
        vec![json!(name)],
    )
}

pub fn set_attributes(id: &RemoteObjectId, attrs: &Map<String, Value>) -> Expression {
    on(
        id,
        "set_attributes",
        "attrs",
        r#"
  Object.entries(attrs).forEach(([name, value]) => this.setAttribute(name, String(value)));"#,
        vec![Value::Object(attrs.clone())],
    )
}

pub fn set_attribute(id: &RemoteObjectId, name: &str, value: &str) -> Expression {
    on(
        id,
        "set_attribute",
        "name, value",
        "\n  this.setAttribute(name, value);",
        vec![json!(name), json!(value)],
    )
}

pub fn remove_attributes(id: &RemoteObjectId, names: &[String]) -> Expression {
    on(
        id,
        "remove_attributes",
        "names",
        "\n  names.forEach((name) => this.removeAttribute(name));",
        vec![json!(names)],
    )
}

pub fn get_children(id: &RemoteObjectId) -> Expression {
    on(
        id,
        "get_children",
        "",
        "\n  return Array.from(this.children || []);",
        vec![],
    )
}

pub fn get_child_by_index(id: &RemoteObjectId, index: usize) -> Expression {
    on(
        id,
        "get_child_by_index",
        "index",
        "\n  return (this.children && this.children[index]) || null;",
        vec![json!(index)],
    )
}

pub fn get_parent(id: &RemoteObjectId) -> Expression {
    on(id, "get_parent", "", "\n  return this.parentElement;", vec![])
}

pub fn get_previous_element_sibling(id: &RemoteObjectId) -> Expression {
    on(
        id,
        "get_previous_element_sibling",
        "",
        "\n  return this.previousElementSibling;",
        vec![],
    )
}

pub fn get_next_element_sibling(id: &RemoteObjectId) -> Expression {
    on(
        id,
        "get_next_element_sibling",
        "",
        "\n  return this.nextElementSibling;",
        vec![],
    )
}

pub fn query_selector(id: &RemoteObjectId, selector: &QuerySelector) -> Expression {
    on_selector(
        id,
        "query_selector",
        selector,
        "",
        "\n  return __one(this, sel);",
        vec![],
    )
}

pub fn query_selector_all(id: &RemoteObjectId, selector: &QuerySelector) -> Expression {
    on_selector(
        id,
        "query_selector_all",
        selector,
        "",
        "\n  return __all(this, sel);",
        vec![],
    )
}

/// Scalar XPath results come back as-is; node sets as their text content.
pub fn xpath(id: &RemoteObjectId, expression: &str) -> Expression {
    on(
        id,
        "xpath",
        "expression",
        r#"
  const doc = this.ownerDocument || this;
  const res = doc.evaluate(expression, this, null, XPathResult.ANY_TYPE, null);
  switch (res.resultType) {
    case XPathResult.NUMBER_TYPE: return res.numberValue;
    case XPathResult.STRING_TYPE: return res.stringValue;
    case XPathResult.BOOLEAN_TYPE: return res.booleanValue;
    default: {
      const out = [];
      let node = res.iterateNext();
      while (node) { out.push(node.textContent); node = res.iterateNext(); }
      return out;
    }
  }"#,
        vec![json!(expression)],
    )
}

pub fn get_inner_text(id: &RemoteObjectId) -> Expression {
    on(id, "get_inner_text", "", "\n  return this.innerText;", vec![])
}

pub fn set_inner_text(id: &RemoteObjectId, text: &str) -> Expression {
    on(
        id,
        "set_inner_text",
        "text",
        "\n  this.innerText = text;",
        vec![json!(text)],
    )
}

/// `null` when the selector matches nothing.
pub fn get_inner_text_by_selector(id: &RemoteObjectId, selector: &QuerySelector) -> Expression {
    on_selector(
        id,
        "get_inner_text_by_selector",
        selector,
        "",
        "\n  const el = __one(this, sel);\n  return el ? el.innerText : null;",
        vec![],
    )
}

/// `false` when the selector matches nothing.
pub fn set_inner_text_by_selector(
    id: &RemoteObjectId,
    selector: &QuerySelector,
    text: &str,
) -> Expression {
    on_selector(
        id,
        "set_inner_text_by_selector",
        selector,
        "text",
        "\n  const el = __one(this, sel);\n  if (!el) { return false; }\n  el.innerText = text;\n  return true;",
        vec![json!(text)],
    )
}

pub fn get_inner_text_by_selector_all(id: &RemoteObjectId, selector: &QuerySelector) -> Expression {
    on_selector(
        id,
        "get_inner_text_by_selector_all",
        selector,
        "",
        "\n  return __all(this, sel).map((el) => el.innerText);",
        vec![],
    )
}

pub fn get_inner_html(id: &RemoteObjectId) -> Expression {
    on(id, "get_inner_html", "", "\n  return this.innerHTML;", vec![])
}

pub fn set_inner_html(id: &RemoteObjectId, html: &str) -> Expression {
    on(
        id,
        "set_inner_html",
        "html",
        "\n  this.innerHTML = html;",
        vec![json!(html)],
    )
}

pub fn get_inner_html_by_selector(id: &RemoteObjectId, selector: &QuerySelector) -> Expression {
    on_selector(
        id,
        "get_inner_html_by_selector",
        selector,
        "",
        "\n  const el = __one(this, sel);\n  return el ? el.innerHTML : null;",
        vec![],
    )
}

pub fn set_inner_html_by_selector(
    id: &RemoteObjectId,
    selector: &QuerySelector,
    html: &str,
) -> Expression {
    on_selector(
        id,
        "set_inner_html_by_selector",
        selector,
        "html",
        "\n  const el = __one(this, sel);\n  if (!el) { return false; }\n  el.innerHTML = html;\n  return true;",
        vec![json!(html)],
    )
}

pub fn get_inner_html_by_selector_all(id: &RemoteObjectId, selector: &QuerySelector) -> Expression {
    on_selector(
        id,
        "get_inner_html_by_selector_all",
        selector,
        "",
        "\n  return __all(this, sel).map((el) => el.innerHTML);",
        vec![],
    )
}

pub fn count_by_selector(id: &RemoteObjectId, selector: &QuerySelector) -> Expression {
    on_selector(
        id,
        "count_by_selector",
        selector,
        "",
        "\n  return __all(this, sel).length;",
        vec![],
    )
}

pub fn exists_by_selector(id: &RemoteObjectId, selector: &QuerySelector) -> Expression {
    on_selector(
        id,
        "exists_by_selector",
        selector,
        "",
        "\n  return __one(this, sel) !== null;",
        vec![],
    )
}

// ---------------------------------------------------------------------------
// Input helpers
// ---------------------------------------------------------------------------

const CENTER_OF: &str = r#"
  const centerOf = (el) => {
    el.scrollIntoView({ block: 'center', inline: 'center', behavior: 'instant' });
    const rect = el.getBoundingClientRect();
    return { x: rect.left + rect.width / 2, y: rect.top + rect.height / 2 };
  };"#;

const CLEAR_FN: &str = r#"
  const clear = (el) => {
    el.focus();
    if ('value' in el && typeof el.value === 'string') {
      if (el.value !== '') {
        el.value = '';
        el.dispatchEvent(new Event('input', { bubbles: true }));
        el.dispatchEvent(new Event('change', { bubbles: true }));
      }
    } else if (el.isContentEditable && el.textContent !== '') {
      el.textContent = '';
      el.dispatchEvent(new Event('input', { bubbles: true }));
    }
    return true;
  };"#;

const SELECT_FN: &str = r#"
  const apply = (el) => {
    if (!el.options) { throw new Error('element is not a select'); }
    const wanted = values.map(String);
    const applied = [];
    if (el.multiple) {
      for (const opt of Array.from(el.options)) {
        opt.selected = wanted.includes(opt.value);
        if (opt.selected) { applied.push(opt.value); }
      }
    } else {
      const options = Array.from(el.options).map((opt) => opt.value);
      const hit = wanted.find((value) => options.includes(value));
      if (hit !== undefined) {
        el.value = hit;
        applied.push(hit);
      }
    }
    el.dispatchEvent(new Event('input', { bubbles: true }));
    el.dispatchEvent(new Event('change', { bubbles: true }));
    return applied;
  };"#;

const SCROLL_INTO_VIEW_FN: &str = r#"
  const reveal = (el) => {
    el.scrollIntoView({ behavior: opts.behavior, block: opts.block, inline: opts.inline });
    return true;
  };"#;

fn scroll_arg(options: &ScrollOptions) -> Value {
    json!({
        "top": options.top,
        "left": options.left,
        "behavior": options.behavior.as_str(),
        "block": options.block.as_str(),
        "inline": options.inline.as_str(),
    })
}

/// Viewport coordinates of the node's center after revealing it.
pub fn get_click_point(id: &RemoteObjectId) -> Expression {
    on(
        id,
        "get_click_point",
        "",
        &predicate_body(CENTER_OF, "\n  return centerOf(this);"),
        vec![],
    )
}

/// Resolves and measures in one evaluation; `null` when nothing matches.
pub fn get_click_point_by_selector(id: &RemoteObjectId, selector: &QuerySelector) -> Expression {
    on_selector(
        id,
        "get_click_point_by_selector",
        selector,
        "",
        &predicate_body(
            CENTER_OF,
            "\n  const el = __one(this, sel);\n  return el ? centerOf(el) : null;",
        ),
        vec![],
    )
}

pub fn focus(id: &RemoteObjectId) -> Expression {
    on(id, "focus", "", "\n  this.focus();\n  return true;", vec![])
}

pub fn focus_by_selector(id: &RemoteObjectId, selector: &QuerySelector) -> Expression {
    on_selector(
        id,
        "focus_by_selector",
        selector,
        "",
        "\n  const el = __one(this, sel);\n  if (!el) { return false; }\n  el.focus();\n  return true;",
        vec![],
    )
}

pub fn blur(id: &RemoteObjectId) -> Expression {
    on(id, "blur", "", "\n  this.blur();\n  return true;", vec![])
}

pub fn blur_by_selector(id: &RemoteObjectId, selector: &QuerySelector) -> Expression {
    on_selector(
        id,
        "blur_by_selector",
        selector,
        "",
        "\n  const el = __one(this, sel);\n  if (!el) { return false; }\n  el.blur();\n  return true;",
        vec![],
    )
}

/// Empties an input or editable node; a no-op when it is already empty.
pub fn clear(id: &RemoteObjectId) -> Expression {
    on(
        id,
        "clear",
        "",
        &predicate_body(CLEAR_FN, "\n  return clear(this);"),
        vec![],
    )
}

pub fn clear_by_selector(id: &RemoteObjectId, selector: &QuerySelector) -> Expression {
    on_selector(
        id,
        "clear_by_selector",
        selector,
        "",
        &predicate_body(
            CLEAR_FN,
            "\n  const el = __one(this, sel);\n  return el ? clear(el) : false;",
        ),
        vec![],
    )
}

/// Returns the option values actually applied.
pub fn select(id: &RemoteObjectId, values: &[String]) -> Expression {
    on(
        id,
        "select",
        "values",
        &predicate_body(SELECT_FN, "\n  return apply(this);"),
        vec![json!(values)],
    )
}

/// Returns the applied values, or `null` when the selector matches nothing.
pub fn select_by_selector(
    id: &RemoteObjectId,
    selector: &QuerySelector,
    values: &[String],
) -> Expression {
    on_selector(
        id,
        "select_by_selector",
        selector,
        "values",
        &predicate_body(
            SELECT_FN,
            "\n  const el = __one(this, sel);\n  return el ? apply(el) : null;",
        ),
        vec![json!(values)],
    )
}

pub fn scroll_into_view(id: &RemoteObjectId, options: &ScrollOptions) -> Expression {
    on(
        id,
        "scroll_into_view",
        "opts",
        &predicate_body(SCROLL_INTO_VIEW_FN, "\n  return reveal(this);"),
        vec![scroll_arg(options)],
    )
}

pub fn scroll_into_view_by_selector(
    id: &RemoteObjectId,
    selector: &QuerySelector,
    options: &ScrollOptions,
) -> Expression {
    on_selector(
        id,
        "scroll_into_view_by_selector",
        selector,
        "opts",
        &predicate_body(
            SCROLL_INTO_VIEW_FN,
            "\n  const el = __one(this, sel);\n  return el ? reveal(el) : false;",
        ),
        vec![scroll_arg(options)],
    )
}

pub fn scroll_by(options: &ScrollOptions) -> Expression {
    global(
        "scroll_by",
        "opts",
        "\n  window.scrollBy({ top: opts.top, left: opts.left, behavior: opts.behavior });\n  return true;",
        vec![scroll_arg(options)],
    )
}

pub fn scroll_top(options: &ScrollOptions) -> Expression {
    global(
        "scroll_top",
        "opts",
        "\n  window.scrollTo({ top: 0, left: opts.left, behavior: opts.behavior });\n  return true;",
        vec![scroll_arg(options)],
    )
}

pub fn scroll_bottom(options: &ScrollOptions) -> Expression {
    global(
        "scroll_bottom",
        "opts",
        r#"
  const height = Math.max(document.body ? document.body.scrollHeight : 0, document.documentElement.scrollHeight);
  window.scrollTo({ top: height, left: opts.left, behavior: opts.behavior });
  return true;"#,
        vec![scroll_arg(options)],
    )
}
