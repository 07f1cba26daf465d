//! Nested-write payload construction.
//!
//! A draft becomes one JSON body in the ORM's nested-write vocabulary:
//!
//! * create: one-to-one blocks are `{"create": body}` and every child list is
//!   `{"create": [rows]}`;
//! * update: one-to-one blocks are `{"upsert": {"create": body, "update": body}}`,
//!   flat child lists are `{"deleteMany": {}, "createMany": {"data": [rows]}}`
//!   and lists whose rows own options are `{"deleteMany": {}, "create": [rows]}`.
//!
//! Child collections are always replaced wholesale: the platform deletes the
//! old rows and creates new ones, so child row ids do not survive an edit.
//! Every row carries `position`, taken from its index in the draft list.
//!
//! Output is a pure function of (draft, mode, options); maps are key-sorted,
//! so building twice from the same snapshot yields identical bytes.

use serde_json::{json, Map, Value};

use crate::config::RuFieldsPolicy;
use crate::domain::*;
use crate::draft::*;
use crate::error::{AdminError, AdminResult};
use crate::util::is_blank;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WriteMode {
    Create,
    Update,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PayloadOptions {
    pub show_russian: bool,
    pub policy: RuFieldsPolicy,
}

impl PayloadOptions {
    /// Russian fields are nulled only when hidden under the `clear` policy.
    pub fn clears_russian(&self) -> bool {
        !self.show_russian && self.policy == RuFieldsPolicy::Clear
    }
}

/// Row/body writer that applies the Russian-field policy.
struct Fields<'a> {
    map: Map<String, Value>,
    opts: &'a PayloadOptions,
}

impl<'a> Fields<'a> {
    fn new(opts: &'a PayloadOptions) -> Self {
        Self { map: Map::new(), opts }
    }

    fn put(&mut self, key: &str, value: impl Into<Value>) -> &mut Self {
        self.map.insert(key.to_string(), value.into());
        self
    }

    fn opt<T: Into<Value> + Clone>(&mut self, key: &str, value: &Option<T>) -> &mut Self {
        let v = value.clone().map_or(Value::Null, Into::into);
        self.put(key, v)
    }

    fn ru(&mut self, key: &str, value: &Option<String>) -> &mut Self {
        if self.opts.clears_russian() {
            self.put(key, Value::Null)
        } else {
            self.opt(key, value)
        }
    }

    fn into_map(self) -> Map<String, Value> {
        self.map
    }
}

fn rows<T>(
    list: &ItemList<T>,
    opts: &PayloadOptions,
    write: impl Fn(&T, &mut Fields<'_>),
) -> Vec<Value> {
    list.values()
        .enumerate()
        .map(|(position, value)| {
            let mut f = Fields::new(opts);
            write(value, &mut f);
            f.put("position", position);
            Value::Object(f.into_map())
        })
        .collect()
}

fn children(mode: WriteMode, rows: Vec<Value>) -> Value {
    match mode {
        WriteMode::Create => json!({ "create": rows }),
        WriteMode::Update => json!({ "deleteMany": {}, "createMany": { "data": rows } }),
    }
}

/// `createMany` cannot carry grandchildren, so lists with options use `create`.
fn children_with_options(mode: WriteMode, rows: Vec<Value>) -> Value {
    match mode {
        WriteMode::Create => json!({ "create": rows }),
        WriteMode::Update => json!({ "deleteMany": {}, "create": rows }),
    }
}

fn block(mode: WriteMode, body: impl Fn(WriteMode) -> Map<String, Value>) -> Value {
    match mode {
        WriteMode::Create => json!({ "create": body(WriteMode::Create) }),
        WriteMode::Update => json!({
            "upsert": { "create": body(WriteMode::Create), "update": body(WriteMode::Update) }
        }),
    }
}

fn option_rows(options: &[QuestionOption], opts: &PayloadOptions) -> Value {
    let rows: Vec<Value> = options
        .iter()
        .enumerate()
        .map(|(position, o)| {
            let mut f = Fields::new(opts);
            f.put("text", o.text.as_str())
                .ru("text_ru", &o.text_ru)
                .put("is_correct", o.is_correct)
                .put("position", position);
            Value::Object(f.into_map())
        })
        .collect();
    json!({ "create": rows })
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

fn module_scalars(m: &ModuleFields, f: &mut Fields<'_>) {
    f.put("title", m.title.as_str())
        .ru("title_ru", &m.title_ru)
        .put("subtitle", m.subtitle.as_str())
        .ru("subtitle_ru", &m.subtitle_ru)
        .put("description", m.description.as_str())
        .ru("description_ru", &m.description_ru)
        .put("level", m.level.as_str())
        .put("duration", m.duration.as_str())
        .put("location", m.location.as_str())
        .ru("location_ru", &m.location_ru)
        .put("region", m.region.as_str())
        .ru("region_ru", &m.region_ru)
        .opt("video_url", &m.video_url)
        .opt("latitude", &m.latitude)
        .opt("longitude", &m.longitude);
}

fn story_body(s: &Story, mode: WriteMode, opts: &PayloadOptions) -> Map<String, Value> {
    let mut f = Fields::new(opts);
    f.put("text", s.fields.text.as_str())
        .ru("text_ru", &s.fields.text_ru)
        .put("mission", s.fields.mission.as_str())
        .ru("mission_ru", &s.fields.mission_ru)
        .put("hint", s.fields.hint.as_str())
        .ru("hint_ru", &s.fields.hint_ru)
        .put("show_translation", s.fields.show_translation);
    let characters = rows(&s.characters, opts, |c, f| {
        f.put("name", c.name.as_str()).ru("name_ru", &c.name_ru);
    });
    f.put("characters", children(mode, characters));
    f.into_map()
}

fn vocabulary_rows(list: &ItemList<VocabularyItem>, opts: &PayloadOptions) -> Vec<Value> {
    rows(list, opts, |v, f| {
        f.put("word", v.word.as_str())
            .put("translation", v.translation.as_str())
            .ru("translation_ru", &v.translation_ru)
            .opt("pronunciation", &v.pronunciation)
            .put("example", v.example.as_str())
            .ru("example_ru", &v.example_ru)
            .opt("audio_url", &v.audio_url);
    })
}

fn grammar_body(g: &Grammar, mode: WriteMode, opts: &PayloadOptions) -> Map<String, Value> {
    let mut f = Fields::new(opts);
    f.put("title", g.fields.title.as_str())
        .ru("title_ru", &g.fields.title_ru)
        .put("explanation", g.fields.explanation.as_str())
        .ru("explanation_ru", &g.fields.explanation_ru);
    let rules = rows(&g.rules, opts, |r, f| {
        f.put("rule", r.rule.as_str()).ru("rule_ru", &r.rule_ru);
    });
    let examples = rows(&g.examples, opts, |e, f| {
        f.put("sentence", e.sentence.as_str())
            .put("translation", e.translation.as_str())
            .ru("translation_ru", &e.translation_ru);
    });
    let exercises = rows(&g.exercises, opts, |e, f| {
        f.put("type", e.kind.as_str())
            .put("question", e.question.as_str())
            .ru("question_ru", &e.question_ru)
            .put("answer", e.answer.as_str())
            .put("options", e.options.clone());
    });
    f.put("rules", children(mode, rules))
        .put("examples", children(mode, examples))
        .put("exercises", children(mode, exercises));
    f.into_map()
}

fn pronunciation_body(p: &Pronunciation, mode: WriteMode, opts: &PayloadOptions) -> Map<String, Value> {
    let mut f = Fields::new(opts);
    f.put("focus", p.fields.focus.as_str()).ru("focus_ru", &p.fields.focus_ru);
    let pairs = rows(&p.minimal_pairs, opts, |m, f| {
        f.put("word_a", m.word_a.as_str())
            .put("word_b", m.word_b.as_str())
            .put("sound_a", m.sound_a.as_str())
            .put("sound_b", m.sound_b.as_str())
            .opt("audio_url_a", &m.audio_url_a)
            .opt("audio_url_b", &m.audio_url_b);
    });
    let exercises = rows(&p.exercises, opts, |e, f| {
        f.put("prompt", e.prompt.as_str())
            .ru("prompt_ru", &e.prompt_ru)
            .put("answer", e.answer.as_str())
            .opt("audio_url", &e.audio_url);
    });
    f.put("minimal_pairs", children(mode, pairs))
        .put("exercises", children(mode, exercises));
    f.into_map()
}

fn question_rows(list: &ItemList<ComprehensionQuestion>, opts: &PayloadOptions) -> Vec<Value> {
    rows(list, opts, |q, f| {
        f.put("type", q.kind.as_str())
            .put("question", q.question.as_str())
            .ru("question_ru", &q.question_ru)
            .put("answer", q.answer.as_str())
            .put("options", option_rows(&q.options, opts));
    })
}

fn listening_body(l: &Listening, mode: WriteMode, opts: &PayloadOptions) -> Map<String, Value> {
    let mut f = Fields::new(opts);
    f.opt("audio_url", &l.fields.audio_url)
        .put("transcript", l.fields.transcript.as_str())
        .ru("transcript_ru", &l.fields.transcript_ru)
        .put("questions", children_with_options(mode, question_rows(&l.questions, opts)));
    f.into_map()
}

fn reading_body(r: &Reading, mode: WriteMode, opts: &PayloadOptions) -> Map<String, Value> {
    let mut f = Fields::new(opts);
    f.put("text", r.fields.text.as_str())
        .ru("text_ru", &r.fields.text_ru)
        .put("questions", children_with_options(mode, question_rows(&r.questions, opts)));
    f.into_map()
}

fn speaking_body(s: &Speaking, mode: WriteMode, opts: &PayloadOptions) -> Map<String, Value> {
    let mut f = Fields::new(opts);
    f.put("content", s.fields.content.as_str())
        .ru("content_ru", &s.fields.content_ru)
        .put("hint", s.fields.hint.as_str())
        .ru("hint_ru", &s.fields.hint_ru);
    let exercises = rows(&s.exercises, opts, |e, f| {
        f.put("prompt", e.prompt.as_str())
            .ru("prompt_ru", &e.prompt_ru)
            .put("expected_response", e.expected_response.as_str())
            .ru("expected_response_ru", &e.expected_response_ru);
    });
    f.put("exercises", children(mode, exercises));
    f.into_map()
}

fn writing_body(w: &Writing, mode: WriteMode, opts: &PayloadOptions) -> Map<String, Value> {
    let mut f = Fields::new(opts);
    f.put("content", w.fields.content.as_str())
        .ru("content_ru", &w.fields.content_ru)
        .put("hint", w.fields.hint.as_str())
        .ru("hint_ru", &w.fields.hint_ru);
    let exercises = rows(&w.exercises, opts, |e, f| {
        f.put("prompt", e.prompt.as_str())
            .ru("prompt_ru", &e.prompt_ru)
            .opt("min_words", &e.min_words)
            .opt("max_words", &e.max_words);
    });
    f.put("exercises", children(mode, exercises));
    f.into_map()
}

fn souvenir_body(s: &Souvenir, opts: &PayloadOptions) -> Map<String, Value> {
    let mut f = Fields::new(opts);
    f.put("name", s.name.as_str())
        .ru("name_ru", &s.name_ru)
        .put("description", s.description.as_str())
        .ru("description_ru", &s.description_ru)
        .opt("download_url", &s.download_url);
    f.into_map()
}

fn cultural_body(c: &Cultural, mode: WriteMode, opts: &PayloadOptions) -> Map<String, Value> {
    let mut f = Fields::new(opts);
    f.put("title", c.fields.title.as_str())
        .ru("title_ru", &c.fields.title_ru)
        .put("content", c.fields.content.as_str())
        .ru("content_ru", &c.fields.content_ru)
        .put("souvenir", block(mode, |_| souvenir_body(&c.souvenir, opts)));
    f.into_map()
}

fn quiz_rows(list: &ItemList<QuizQuestion>, opts: &PayloadOptions) -> Vec<Value> {
    rows(list, opts, |q, f| {
        f.put("type", q.kind.as_str())
            .put("question", q.question.as_str())
            .ru("question_ru", &q.question_ru)
            .put("answer", q.answer.as_str())
            .opt("audio_url", &q.audio_url)
            .put("options", option_rows(&q.options, opts));
    })
}

fn mission_body(m: &MissionChallenge, mode: WriteMode, opts: &PayloadOptions) -> Map<String, Value> {
    let mut f = Fields::new(opts);
    f.put("title", m.fields.title.as_str())
        .ru("title_ru", &m.fields.title_ru)
        .put("description", m.fields.description.as_str())
        .ru("description_ru", &m.fields.description_ru);
    let requirements = rows(&m.requirements, opts, |r, f| {
        f.put("text", r.text.as_str()).ru("text_ru", &r.text_ru);
    });
    f.put("requirements", children(mode, requirements));
    f.into_map()
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Build the whole nested-write body for a draft snapshot.
pub fn build_payload(d: &ModuleDraft, mode: WriteMode, opts: &PayloadOptions) -> Value {
    let mut f = Fields::new(opts);
    module_scalars(&d.fields, &mut f);
    f.put("story", block(mode, |m| story_body(&d.story, m, opts)))
        .put("vocabulary", children(mode, vocabulary_rows(&d.vocabulary, opts)))
        .put("grammar", block(mode, |m| grammar_body(&d.grammar, m, opts)))
        .put("pronunciation", block(mode, |m| pronunciation_body(&d.pronunciation, m, opts)))
        .put("listening", block(mode, |m| listening_body(&d.listening, m, opts)))
        .put("speaking", block(mode, |m| speaking_body(&d.speaking, m, opts)))
        .put("reading", block(mode, |m| reading_body(&d.reading, m, opts)))
        .put("writing", block(mode, |m| writing_body(&d.writing, m, opts)))
        .put("cultural", block(mode, |m| cultural_body(&d.cultural, m, opts)))
        .put("quiz", children_with_options(mode, quiz_rows(&d.quiz, opts)))
        .put("mission_challenge", block(mode, |m| mission_body(&d.mission_challenge, m, opts)));
    Value::Object(f.into_map())
}

/// Body for `POST /api/modules/new`. The title must not be blank.
pub fn build_create(d: &ModuleDraft, opts: &PayloadOptions) -> AdminResult<Value> {
    if is_blank(&d.fields.title) {
        return Err(AdminError::Validation("module title is required".into()));
    }
    Ok(build_payload(d, WriteMode::Create, opts))
}

/// Body for `PATCH /api/modules/admin/:id`.
pub fn build_update(d: &ModuleDraft, opts: &PayloadOptions) -> Value {
    build_payload(d, WriteMode::Update, opts)
}
