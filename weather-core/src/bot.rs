//! Texts the bot answers with outside of weather reports: the command menu,
//! the `/about` caption and the `/stop` confirmation.

use crate::i18n::Translator;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BotCommand {
    Start,
    About,
    Stop,
    Get,
}

impl BotCommand {
    pub const fn all() -> &'static [BotCommand] {
        &[BotCommand::Start, BotCommand::About, BotCommand::Stop, BotCommand::Get]
    }

    pub fn name(&self) -> &'static str {
        match self {
            BotCommand::Start => "start",
            BotCommand::About => "about",
            BotCommand::Stop => "stop",
            BotCommand::Get => "get",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            BotCommand::Start => "▶️",
            BotCommand::About => "ℹ️",
            BotCommand::Stop => "⏹",
            BotCommand::Get => "🌤",
        }
    }

    pub fn description_key(&self) -> &'static str {
        match self {
            BotCommand::Start => "设置天气预报",
            BotCommand::About => "机器人信息",
            BotCommand::Stop => "停止机器人并删除数据",
            BotCommand::Get => "获取天气",
        }
    }
}

impl TryFrom<&str> for BotCommand {
    type Error = anyhow::Error;

    /// Accepts `"get"` as well as `"/get"`.
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let name = value.trim().trim_start_matches('/');

        BotCommand::all().iter().copied().find(|c| c.name() == name).ok_or_else(|| {
            anyhow::anyhow!("Unknown command '{value}'. Supported commands: start, about, stop, get.")
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandEntry {
    pub command: &'static str,
    pub description: String,
}

pub fn command_menu(translator: &dyn Translator, lang: &str) -> Vec<CommandEntry> {
    BotCommand::all()
        .iter()
        .map(|c| CommandEntry {
            command: c.name(),
            description: format!("{} {}", c.icon(), translator.translate(c.description_key(), lang)),
        })
        .collect()
}

/// One menu per locale, in the order given.
pub fn command_menus(
    translator: &dyn Translator,
    locales: &[String],
) -> Vec<(String, Vec<CommandEntry>)> {
    locales.iter().map(|lang| (lang.clone(), command_menu(translator, lang))).collect()
}

pub fn about_text(translator: &dyn Translator, lang: &str) -> String {
    let t = |key: &str| translator.translate(key, lang);

    format!(
        "🤖 <b>OpenWeatherBot</b>\n\
         {}: <b>Rust</b>\n\n\
         {} <a href=\"https://openweathermap.org/\">OpenWeather</a>\n\
         {} <a href=\"https://freeicons.io/profile/2257\">www.wishforge.games</a>\n\
         {} <a href=\"https://github.com/rin-gil/OpenWeatherBot\">GitHub</a>",
        t("编程语言"),
        t("天气数据来源"),
        t("图标作者"),
        t("源代码见"),
    )
}

pub fn data_deleted_text(translator: &dyn Translator, lang: &str) -> String {
    format!("❌ {}", translator.translate("你的所有数据已被删除", lang))
}
