use std::collections::HashMap;

use crate::error::FallbackTableError;

pub const BASELINE_LANGUAGE: &str = "es";

pub const SUPPORTED_LANGUAGES: [&str; 10] = ["en", "es", "ca", "fr", "de", "it", "pt", "ru", "ja", "zh"];

const BUILTIN_WORDS: &[(&str, &[&str])] = &[
    (
        "en",
        &[
            "Beach", "Hospital", "Airplane", "Library", "Pizza", "Guitar", "Elephant", "Castle",
            "Submarine", "Volcano", "Birthday", "Supermarket", "Football", "Dentist", "Rainbow",
        ],
    ),
    (
        "es",
        &[
            "Playa", "Hospital", "Avión", "Biblioteca", "Pizza", "Guitarra", "Elefante",
            "Castillo", "Submarino", "Volcán", "Cumpleaños", "Supermercado", "Fútbol", "Dentista",
            "Arcoíris",
        ],
    ),
    (
        "ca",
        &[
            "Platja", "Hospital", "Avió", "Biblioteca", "Pizza", "Guitarra", "Elefant", "Castell",
            "Submarí", "Volcà", "Aniversari", "Supermercat", "Futbol", "Dentista", "Arc de Sant Martí",
        ],
    ),
    (
        "fr",
        &[
            "Plage", "Hôpital", "Avion", "Bibliothèque", "Pizza", "Guitare", "Éléphant", "Château",
            "Sous-marin", "Volcan", "Anniversaire", "Supermarché", "Football", "Dentiste",
            "Arc-en-ciel",
        ],
    ),
    (
        "de",
        &[
            "Strand", "Krankenhaus", "Flugzeug", "Bibliothek", "Pizza", "Gitarre", "Elefant",
            "Burg", "U-Boot", "Vulkan", "Geburtstag", "Supermarkt", "Fußball", "Zahnarzt",
            "Regenbogen",
        ],
    ),
    (
        "it",
        &[
            "Spiaggia", "Ospedale", "Aereo", "Biblioteca", "Pizza", "Chitarra", "Elefante",
            "Castello", "Sottomarino", "Vulcano", "Compleanno", "Supermercato", "Calcio",
            "Dentista", "Arcobaleno",
        ],
    ),
    (
        "pt",
        &[
            "Praia", "Hospital", "Avião", "Biblioteca", "Pizza", "Violão", "Elefante", "Castelo",
            "Submarino", "Vulcão", "Aniversário", "Supermercado", "Futebol", "Dentista",
            "Arco-íris",
        ],
    ),
    (
        "ru",
        &[
            "Пляж", "Больница", "Самолёт", "Библиотека", "Пицца", "Гитара", "Слон", "Замок",
            "Подводная лодка", "Вулкан", "День рождения", "Супермаркет", "Футбол", "Стоматолог",
            "Радуга",
        ],
    ),
    (
        "ja",
        &[
            "ビーチ", "病院", "飛行機", "図書館", "ピザ", "ギター", "ゾウ", "お城", "潜水艦", "火山",
            "誕生日", "スーパー", "サッカー", "歯医者", "虹",
        ],
    ),
    (
        "zh",
        &[
            "海滩", "医院", "飞机", "图书馆", "披萨", "吉他", "大象", "城堡", "潜水艇", "火山", "生日",
            "超市", "足球", "牙医", "彩虹",
        ],
    ),
];

/// 言語コード → 予備ワードリスト。基準言語のリストは必ず存在する。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackTable {
    baseline: String,
    lists: HashMap<String, Vec<String>>,
}

impl Default for FallbackTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl FallbackTable {
    pub fn builtin() -> Self {
        let lists = BUILTIN_WORDS
            .iter()
            .map(|(language, words)| {
                (
                    language.to_string(),
                    words.iter().map(|w| w.to_string()).collect(),
                )
            })
            .collect();
        Self {
            baseline: BASELINE_LANGUAGE.to_string(),
            lists,
        }
    }

    pub fn new(
        baseline: impl Into<String>,
        lists: HashMap<String, Vec<String>>,
    ) -> Result<Self, FallbackTableError> {
        let baseline = baseline.into();
        if let Some((language, _)) = lists.iter().find(|(_, words)| words.is_empty()) {
            return Err(FallbackTableError::EmptyList(language.clone()));
        }
        if !lists.contains_key(&baseline) {
            return Err(FallbackTableError::MissingBaseline(baseline));
        }
        Ok(Self { baseline, lists })
    }

    /// `{"es": ["Playa", ...], "en": [...]}` 形式のJSONを読み込む
    pub fn from_json(baseline: &str, json: &str) -> Result<Self, FallbackTableError> {
        let lists: HashMap<String, Vec<String>> = serde_json::from_str(json)?;
        Self::new(baseline, lists)
    }

    pub fn baseline(&self) -> &str {
        &self.baseline
    }

    pub fn has_language(&self, language: &str) -> bool {
        self.lists.contains_key(language)
    }

    /// 未登録の言語は基準言語のリストになる
    pub fn words_for(&self, language: &str) -> &[String] {
        self.lists
            .get(language)
            .or_else(|| self.lists.get(&self.baseline))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

pub fn is_supported_language(language: &str) -> bool {
    SUPPORTED_LANGUAGES.contains(&language)
}
