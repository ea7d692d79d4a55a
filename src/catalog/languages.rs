/// A language option the translation agents accept.
///
/// `name` is the display name the document agent expects in its
/// `from_lang`/`to_lang` variables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Language {
    pub code: &'static str,
    pub name: &'static str,
}

const fn lang(code: &'static str, name: &'static str) -> Language {
    Language { code, name }
}

pub const SOURCE_LANGUAGES: &[Language] = &[
    lang("auto", "自动检测"),
    lang("zh-CN", "简体中文"),
    lang("zh-TW", "繁体中文"),
    lang("wyw", "文言文"),
    lang("yue", "粤语"),
    lang("en", "英语"),
    lang("ja", "日语"),
    lang("ko", "韩语"),
    lang("fr", "法语"),
    lang("de", "德语"),
    lang("es", "西班牙语"),
    lang("ru", "俄语"),
    lang("pt", "葡萄牙语"),
    lang("it", "意大利语"),
    lang("ar", "阿拉伯语"),
    lang("hi", "印地语"),
    lang("th", "泰语"),
    lang("vi", "越南语"),
    lang("my", "缅甸语"),
    lang("ms", "马来语"),
];

pub const TARGET_LANGUAGES: &[Language] = &[
    lang("zh-CN", "简体中文"),
    lang("zh-TW", "繁体中文"),
    lang("wyw", "文言文"),
    lang("yue", "粤语"),
    lang("en", "英语"),
    lang("en-GB", "英语（英国）"),
    lang("en-US", "英语（美国）"),
    lang("ja", "日语"),
    lang("ko", "韩语"),
    lang("fr", "法语"),
    lang("de", "德语"),
    lang("es", "西班牙语"),
    lang("ru", "俄语"),
    lang("pt", "葡萄牙语"),
    lang("it", "意大利语"),
    lang("ar", "阿拉伯语"),
    lang("hi", "印地语"),
    lang("th", "泰语"),
    lang("vi", "越南语"),
    lang("my", "缅甸语"),
    lang("ms", "马来语"),
];

/// Display name for a language code, or the code itself when unknown.
pub fn language_name(code: &str) -> &str {
    SOURCE_LANGUAGES
        .iter()
        .chain(TARGET_LANGUAGES.iter())
        .find(|l| l.code == code)
        .map(|l| l.name)
        .unwrap_or(code)
}
