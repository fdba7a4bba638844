//! HTML 页面
//!
//! 表单 + 状态栏 + 结果卡片。每次请求整页重新生成。

use crate::application::renderer::{PENDING_TEXT, SENDING_STATUS};
use crate::application::{RenderedResult, SectionBody, StatusMessage};
use crate::domain::analysis::format_bytes;

/// 页面数据
#[derive(Debug, Clone)]
pub struct PageView {
    pub models: Vec<String>,
    pub selected_model: String,
    pub temperature: f64,
    pub max_file_size: u64,
    pub status: Option<StatusMessage>,
    pub result: Option<RenderedResult>,
}

/// HTML 转义
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn render_status(status: &StatusMessage) -> String {
    let class = if status.is_error { "status error" } else { "status" };
    format!(
        r#"<div id="status" class="{}">{}</div>"#,
        class,
        escape_html(&status.text)
    )
}

/// 结果卡片
pub fn render_result_card(result: &RenderedResult) -> String {
    let mut html = String::from(r#"<div id="resultCard" class="card">"#);

    for section in &result.sections {
        if let Some(label) = section.label {
            html.push_str(&format!("<h3>{}</h3>", escape_html(label)));
        }
        match &section.body {
            SectionBody::Paragraph(text) => {
                html.push_str(&format!("<p>{}</p>", escape_html(text)));
            }
            SectionBody::List(items) => {
                html.push_str("<ul>");
                for item in items {
                    html.push_str(&format!("<li>{}</li>", escape_html(item)));
                }
                html.push_str("</ul>");
            }
        }
    }

    if !result.metadata.is_empty() {
        html.push_str(r#"<ul class="meta">"#);
        for line in &result.metadata {
            html.push_str(&format!("<li>{}</li>", escape_html(line)));
        }
        html.push_str("</ul>");
    }

    html.push_str("</div>");
    html
}

const STYLE: &str = "body{font-family:sans-serif;max-width:720px;margin:2rem auto;padding:0 1rem}\
label{display:block;margin-top:1rem;font-weight:bold}\
input,select{width:100%;padding:.4rem;box-sizing:border-box}\
button{margin-top:1.2rem;padding:.6rem 1.2rem}\
.status{margin-top:1rem;padding:.6rem;border-radius:6px;background:#f1f4ff;color:#3a4380}\
.status.error{background:#ffe7e7;color:#8a1f1f}\
.card{margin-top:1rem;padding:1rem;border:1px solid #dde;border-radius:8px}\
.meta{color:#666;font-size:.9rem}";

/// 选择文件后的状态前缀
pub const SELECTED_PREFIX: &str = "選択中: ";

// 按钮仅在密钥与文件都存在时可用；提交后禁用直到页面返回
const SCRIPT: &str = "const k=document.getElementById('apiKey'),f=document.getElementById('audioFile'),b=document.getElementById('analyzeButton'),s=document.getElementById('statusSlot'),r=document.getElementById('resultSlot');\
const show=t=>{const d=document.createElement('div');d.id='status';d.className='status';d.textContent=t;s.replaceChildren(d)};\
const mb=n=>(n/1048576).toFixed(1)+'MB';\
const u=()=>{b.disabled=!k.value.trim()||!f.files.length};\
k.addEventListener('input',u);\
f.addEventListener('change',()=>{u();if(f.files.length){const x=f.files[0];show(__SELECTED__+x.name+' ('+mb(x.size)+')')}});\
document.getElementById('form').addEventListener('submit',()=>{b.disabled=true;show(__SENDING__);r.innerHTML=__PENDING__});u();";

/// JS 字符串字面量
fn js_string(text: &str) -> String {
    serde_json::Value::from(text).to_string()
}

/// 页面脚本，提示文本与占位卡片由服务端填入
fn render_script() -> String {
    let pending_card = render_result_card(&RenderedResult::pending());
    SCRIPT
        .replace("__SELECTED__", &js_string(SELECTED_PREFIX))
        .replace("__SENDING__", &js_string(SENDING_STATUS))
        .replace("__PENDING__", &js_string(&pending_card))
}

/// 整页 HTML
pub fn render_page(view: &PageView) -> String {
    let options: String = view
        .models
        .iter()
        .map(|m| {
            let selected = if *m == view.selected_model { " selected" } else { "" };
            format!(
                r#"<option value="{0}"{1}>{0}</option>"#,
                escape_html(m),
                selected
            )
        })
        .collect();

    let status = view.status.as_ref().map(render_status).unwrap_or_default();
    let result = view
        .result
        .as_ref()
        .map(render_result_card)
        .unwrap_or_default();

    format!(
        r#"<!DOCTYPE html>
<html lang="ja">
<head>
<meta charset="utf-8">
<title>漏水音判定</title>
<style>{style}</style>
</head>
<body>
<h1>漏水音判定</h1>
<form id="form" method="post" action="/analyze" enctype="multipart/form-data">
<label for="apiKey">Gemini APIキー</label>
<input id="apiKey" name="api_key" type="password" autocomplete="off">
<label for="audioFile">音声ファイル (最大 {max})</label>
<input id="audioFile" name="audio_file" type="file" accept="audio/*">
<label for="model">モデル</label>
<select id="model" name="model">{options}</select>
<label for="temperature">温度 (0.0〜1.0)</label>
<input id="temperature" name="temperature" type="number" min="0" max="1" step="0.1" value="{temperature}">
<button id="analyzeButton" type="submit">判定する</button>
</form>
<div id="statusSlot">{status}</div>
<div id="resultSlot">{result}</div>
<script>{script}</script>
</body>
</html>
"#,
        style = STYLE,
        max = format_bytes(view.max_file_size),
        options = options,
        temperature = view.temperature,
        status = status,
        result = result,
        script = render_script(),
    )
}
