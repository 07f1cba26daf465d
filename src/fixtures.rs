//! Shared test data: a fully populated module record as the platform returns it.

use serde_json::{json, Value};

use crate::draft::ModuleDraft;
use crate::record::ModuleRecord;

pub fn module_record_json(id: i64) -> Value {
    json!({
        "id": id,
        "title": "Tbilisi Old Town",
        "title_ru": "Старый Тбилиси",
        "subtitle": "Sulfur baths and bakeries",
        "subtitle_ru": "Серные бани и пекарни",
        "description": "Walk the old town.",
        "description_ru": "Прогулка по старому городу.",
        "level": "A2",
        "duration": "45 min",
        "location": "Tbilisi",
        "location_ru": "Тбилиси",
        "region": "Kartli",
        "region_ru": "Картли",
        "video_url": "https://cdn.example/tbilisi.mp4",
        "latitude": 41.69,
        "longitude": 44.8,
        "story": {
            "text": "Nino meets Giorgi.", "text_ru": "Нино встречает Георгия.",
            "mission": "Find the bakery.", "mission_ru": "Найди пекарню.",
            "hint": "Follow the smell.", "hint_ru": "Иди на запах.",
            "show_translation": true,
            "characters": [
                { "name": "Giorgi", "name_ru": "Георгий", "position": 1 },
                { "name": "Nino", "name_ru": "Нино", "position": 0 }
            ]
        },
        "vocabulary": [
            { "word": "gamarjoba", "translation": "hello", "translation_ru": "привет",
              "example": "Gamarjoba, Nino!", "example_ru": "Привет, Нино!", "position": 1 },
            { "word": "madloba", "translation": "thank you", "translation_ru": "спасибо",
              "pronunciation": "mad-lo-ba", "example": "Didi madloba.", "example_ru": "Большое спасибо.",
              "audio_url": "https://cdn.example/madloba.mp3", "position": 0 }
        ],
        "grammar": {
            "title": "Verb agreement", "title_ru": "Согласование глаголов",
            "explanation": "Verbs mark the subject.", "explanation_ru": "Глагол отмечает подлежащее.",
            "rules": [
                { "rule": "Verbs agree", "rule_ru": "Глаголы согласуются", "position": 1 },
                { "rule": "Drop pronouns", "rule_ru": "Местоимения опускаются", "position": 0 }
            ],
            "examples": [
                { "sentence": "Me vtsekvav.", "translation": "I dance.", "translation_ru": "Я танцую.", "position": 0 }
            ],
            "exercises": [
                { "type": "choice", "question": "Pick the verb", "question_ru": "Выберите глагол",
                  "answer": "vtsekvav", "options": ["vtsekvav", "tsekvavs"], "position": 0 }
            ]
        },
        "pronunciation": {
            "focus": "Ejectives", "focus_ru": "Абруптивы",
            "minimal_pairs": [
                { "word_a": "kari", "word_b": "k'ari", "sound_a": "k", "sound_b": "k'", "position": 0 }
            ],
            "exercises": [
                { "prompt": "Say k'ari", "prompt_ru": "Скажите k'ari", "answer": "k'ari", "position": 0 }
            ]
        },
        "listening": {
            "audio_url": "https://cdn.example/market.mp3",
            "transcript": "At the market.", "transcript_ru": "На рынке.",
            "questions": [
                { "type": "choice", "question": "Where are they?", "question_ru": "Где они?",
                  "answer": "Market", "position": 0,
                  "options": [
                      { "text": "Market", "text_ru": "Рынок", "is_correct": true, "position": 0 },
                      { "text": "Park", "text_ru": "Парк", "position": 1 }
                  ] }
            ]
        },
        "speaking": {
            "content": "Greet the baker.", "content_ru": "Поздоровайтесь с пекарем.",
            "hint": "Use gamarjoba.", "hint_ru": "Используйте gamarjoba.",
            "exercises": [
                { "prompt": "Say hello", "prompt_ru": "Скажите привет",
                  "expected_response": "Gamarjoba", "expected_response_ru": "Привет", "position": 0 }
            ]
        },
        "reading": {
            "text": "The bakery opens at eight.", "text_ru": "Пекарня открывается в восемь.",
            "questions": [
                { "type": "open", "question": "When?", "question_ru": "Когда?", "answer": "Eight", "position": 0 }
            ]
        },
        "writing": {
            "content": "Describe your street.", "content_ru": "Опишите свою улицу.",
            "hint": "Three sentences.", "hint_ru": "Три предложения.",
            "exercises": [
                { "prompt": "Your street", "prompt_ru": "Ваша улица", "min_words": 20, "max_words": 80, "position": 0 }
            ]
        },
        "cultural": {
            "title": "Supra", "title_ru": "Супра",
            "content": "The Georgian feast.", "content_ru": "Грузинское застолье.",
            "souvenir": {
                "name": "Horn", "name_ru": "Рог",
                "description": "A drinking horn.", "description_ru": "Рог для вина.",
                "download_url": "https://cdn.example/horn.pdf"
            }
        },
        "quiz": [
            { "type": "choice", "question": "Capital?", "question_ru": "Столица?", "answer": "Tbilisi",
              "audio_url": null, "position": 0,
              "options": [
                  { "text": "Tbilisi", "text_ru": "Тбилиси", "is_correct": true, "position": 0 },
                  { "text": "Rustavi", "text_ru": "Рустави", "position": 1 }
              ] }
        ],
        "mission_challenge": {
            "title": "Order bread", "title_ru": "Закажи хлеб",
            "description": "At the tone bakery.", "description_ru": "В пекарне тоне.",
            "requirements": [
                { "text": "Greet", "text_ru": "Поздоровайся", "position": 0 },
                { "text": "Pay", "text_ru": "Заплати", "position": 1 }
            ]
        }
    })
}

pub fn rich_draft() -> ModuleDraft {
    let record: ModuleRecord =
        serde_json::from_value(module_record_json(7)).expect("fixture record deserializes");
    ModuleDraft::from(record)
}
