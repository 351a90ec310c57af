//! 预览执行外壳
//!
//! 生成的文档由三部分组成：
//! - 头部：桥接初始化、库脚本与触控手势抑制（禁止缩放、选择、长按菜单与页面滚动）
//! - 桥接初始化：拦截 `console.log/info/warn/error` 与 `window.onerror`，
//!   每个事件以 `{source, severity, text}` 发送到宿主窗口。
//!   它独占一个 `<script>` 元素，用户代码的语法错误不会阻止它安装
//! - 守卫：用户代码整体包在 `try/catch` 中，异常转为一条 error 级日志

use regex::Regex;
use std::fmt::Write as _;
use std::sync::OnceLock;

/// 桥接对象挂在 `window` 上的名字
pub const BRIDGE_GLOBAL: &str = "__sketchpadBridge";

/// 宿主注入 JS 时使用的字符串字面量
fn js_string(value: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "\"\"".to_string())
}

/// 桥接初始化代码，必须在任何用户代码之前执行
pub fn bridge_init(origin_tag: &str) -> String {
    format!(
        r#"(function () {{
  var ORIGIN = {origin};
  var original = {{
    log: console.log,
    info: console.info,
    warn: console.warn,
    error: console.error
  }};

  function format(args) {{
    return Array.prototype.map.call(args, function (a) {{
      if (a instanceof Error) return String(a);
      if (typeof a === 'object' && a !== null) {{
        try {{ return JSON.stringify(a); }} catch (e) {{ return String(a); }}
      }}
      return String(a);
    }}).join(' ');
  }}

  function send(severity, text) {{
    try {{
      window.parent.postMessage({{ source: ORIGIN, severity: severity, text: text }}, '*');
    }} catch (e) {{
      // postMessage 失败时丢弃该条日志
    }}
  }}

  function hook(name, severity) {{
    console[name] = function () {{
      send(severity, format(arguments));
      original[name].apply(console, arguments);
    }};
  }}

  hook('log', 'info');
  hook('info', 'info');
  hook('warn', 'warning');
  hook('error', 'error');

  window.onerror = function (msg, url, lineNo) {{
    send('error', lineNo ? msg + ' (Line: ' + lineNo + ')' : String(msg));
    return false;
  }};

  window.{bridge} = {{
    send: send,
    report: function (e) {{
      var text = String(e);
      if (e && e.lineNumber) text += ' (Line: ' + e.lineNumber + ')';
      send('error', text);
      original.error.call(console, e);
    }}
  }};
}})();
"#,
        origin = js_string(origin_tag),
        bridge = BRIDGE_GLOBAL,
    )
}

/// 用守卫包裹整段程序
pub fn guard(body: &str) -> String {
    let mut out = String::with_capacity(body.len() + 160);
    out.push_str("try {\n");
    out.push_str(body);
    if !body.ends_with('\n') {
        out.push('\n');
    }
    let _ = write!(
        out,
        "}} catch (e) {{\n  if (window.{b}) {{ window.{b}.report(e); }} else {{ console.error(e); }}\n}}\n",
        b = BRIDGE_GLOBAL
    );
    out
}

fn script_close_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new("(?i)</(script)").expect("script close pattern is valid"))
}

/// 防止脚本里的 `</script`（不区分大小写）提前结束标签
fn escape_script_body(code: &str) -> String {
    script_close_pattern()
        .replace_all(code, "<\\/$1")
        .into_owned()
}

/// 组装完整的 HTML 文档；`bridge` 在头部单独执行，`program` 在 body 中执行
pub fn render_document(bridge: &str, program: &str, library_url: &str) -> String {
    let mut html = String::with_capacity(program.len() + 2048);
    html.push_str(
        r#"<!DOCTYPE html>
<html>
  <head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0, maximum-scale=1.0, user-scalable=no">
"#,
    );
    if !bridge.is_empty() {
        html.push_str("    <script>\n");
        html.push_str(&escape_script_body(bridge));
        if !bridge.ends_with('\n') {
            html.push('\n');
        }
        html.push_str("    </script>\n");
    }
    if !library_url.is_empty() {
        let _ = writeln!(
            html,
            "    <script src={}></script>",
            js_string(library_url)
        );
    }
    html.push_str(
        r#"    <style>
      body {
        margin: 0;
        padding: 0;
        overflow: hidden;
        background-color: #18181b;
        display: flex;
        justify-content: center;
        align-items: center;
        height: 100vh;
        width: 100vw;
        touch-action: none;
        -webkit-user-select: none;
        user-select: none;
        -webkit-touch-callout: none;
      }
      canvas {
        display: block;
        touch-action: none;
      }
    </style>
  </head>
  <body>
    <script>
      document.addEventListener('touchmove', function (e) { e.preventDefault(); }, { passive: false });
      document.addEventListener('gesturestart', function (e) { e.preventDefault(); });
    </script>
    <script>
"#,
    );
    html.push_str(&escape_script_body(program));
    html.push_str(
        r#"    </script>
  </body>
</html>
"#,
    );
    html
}
