pub const INDEX_HTML: &str = include_str!("../../static/index.html");
pub const APP_JS: &str = include_str!("../../static/app.js");
