//! Analytics collections (as the platform returns them) and the client-side
//! merge into a tabbed dashboard.
//!
//! All aggregation is a single pass over small in-memory lists:
//!   - module completion rate: students whose completed list holds the module
//!     id, divided by the student count
//!   - achievements grouped by name
//!   - time spent bucketed into configured minute ranges
//!   - exam attempts summarized overall and per module

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::protocol::PageChrome;
use crate::util::null_as_default;

// ---------------------------------------------------------------------------
// Upstream collections
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Achievement {
  #[serde(default, deserialize_with = "null_as_default")] pub name: String,
  #[serde(default)] pub category: Option<String>,
  #[serde(default, alias = "earnedAt")] pub earned_at: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Student {
  pub id: i64,
  #[serde(default, deserialize_with = "null_as_default")] pub name: String,
  #[serde(default)] pub email: Option<String>,
  #[serde(default)] pub country: Option<String>,
  #[serde(default, alias = "nativeLanguage")] pub native_language: Option<String>,
  #[serde(default)] pub level: Option<String>,
  #[serde(default, alias = "completedModules", deserialize_with = "null_as_default")]
  pub completed_modules: Vec<i64>,
  #[serde(default, deserialize_with = "null_as_default")] pub achievements: Vec<Achievement>,
  #[serde(default, alias = "timeSpentMinutes", deserialize_with = "null_as_default")]
  pub time_spent_minutes: f64,
  #[serde(default, alias = "lastActiveAt")] pub last_active_at: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ExamResult {
  #[serde(default)] pub id: Option<i64>,
  #[serde(default, alias = "studentId")] pub student_id: Option<i64>,
  #[serde(default, alias = "moduleId")] pub module_id: Option<i64>,
  #[serde(default, deserialize_with = "null_as_default")] pub score: f64,
  #[serde(default, alias = "maxScore")] pub max_score: Option<f64>,
  #[serde(default, deserialize_with = "null_as_default")] pub passed: bool,
  #[serde(default, alias = "takenAt")] pub taken_at: Option<String>,
}

impl ExamResult {
  /// Score as a percentage of `max_score` (100 when absent).
  pub fn percent(&self) -> f64 {
    let max = self.max_score.unwrap_or(100.0);
    if max <= 0.0 { 0.0 } else { self.score / max * 100.0 }
  }
}

/// Headline numbers computed by the platform. Unknown keys pass through.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct OverviewStats {
  #[serde(default, alias = "totalStudents", deserialize_with = "null_as_default")] pub total_students: u64,
  #[serde(default, alias = "activeStudents", deserialize_with = "null_as_default")] pub active_students: u64,
  #[serde(default, alias = "totalModules", deserialize_with = "null_as_default")] pub total_modules: u64,
  #[serde(default, alias = "averageScore", deserialize_with = "null_as_default")] pub average_score: f64,
  #[serde(default, alias = "completionRate", deserialize_with = "null_as_default")] pub completion_rate: f64,
  #[serde(flatten)] pub extra: Map<String, Value>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ActivityPoint {
  #[serde(default, deserialize_with = "null_as_default")] pub date: String,
  #[serde(default, deserialize_with = "null_as_default")] pub count: u64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EngagementMetrics {
  #[serde(default, alias = "dailyActiveUsers", deserialize_with = "null_as_default")] pub daily_active_users: u64,
  #[serde(default, alias = "weeklyActiveUsers", deserialize_with = "null_as_default")] pub weekly_active_users: u64,
  #[serde(default, alias = "monthlyActiveUsers", deserialize_with = "null_as_default")] pub monthly_active_users: u64,
  #[serde(default, alias = "averageSessionMinutes", deserialize_with = "null_as_default")] pub average_session_minutes: f64,
  #[serde(default, deserialize_with = "null_as_default")] pub activity: Vec<ActivityPoint>,
  #[serde(flatten)] pub extra: Map<String, Value>,
}

/// One row of a language / country / level distribution.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DistributionEntry {
  #[serde(default, alias = "language", alias = "country", alias = "level", alias = "name",
          deserialize_with = "null_as_default")]
  pub label: String,
  #[serde(default, alias = "value", alias = "students", deserialize_with = "null_as_default")]
  pub count: u64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TopPerformer {
  #[serde(default, alias = "id", alias = "studentId")] pub student_id: Option<i64>,
  #[serde(default, deserialize_with = "null_as_default")] pub name: String,
  #[serde(default, alias = "averageScore", deserialize_with = "null_as_default")] pub average_score: f64,
  #[serde(default, alias = "completedModules", deserialize_with = "null_as_default")] pub completed_modules: u64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DifficultModule {
  #[serde(default, alias = "id", alias = "moduleId")] pub module_id: Option<i64>,
  #[serde(default, deserialize_with = "null_as_default")] pub title: String,
  #[serde(default, alias = "averageScore", deserialize_with = "null_as_default")] pub average_score: f64,
  #[serde(default, alias = "failureRate")] pub failure_rate: Option<f64>,
  #[serde(default)] pub attempts: Option<u64>,
}

/// Module list entry (`GET /api/modules`).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ModuleSummary {
  pub id: i64,
  #[serde(default, deserialize_with = "null_as_default")] pub title: String,
  #[serde(default)] pub title_ru: Option<String>,
  #[serde(default, deserialize_with = "null_as_default")] pub level: String,
  #[serde(default, deserialize_with = "null_as_default")] pub region: String,
}

/// The ten collections one dashboard load fetches.
#[derive(Clone, Debug, Default)]
pub struct AnalyticsSnapshot {
  pub students: Vec<Student>,
  pub exam_results: Vec<ExamResult>,
  pub overview: OverviewStats,
  pub engagement: EngagementMetrics,
  pub languages: Vec<DistributionEntry>,
  pub countries: Vec<DistributionEntry>,
  pub levels: Vec<DistributionEntry>,
  pub top_performers: Vec<TopPerformer>,
  pub difficult_modules: Vec<DifficultModule>,
  pub modules: Vec<ModuleSummary>,
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ModuleCompletion {
  pub module_id: i64,
  pub title: String,
  pub level: String,
  pub completed_count: usize,
  /// 0.0..=1.0
  pub completion_rate: f64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AchievementGroup {
  pub name: String,
  pub count: usize,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TimeBucket {
  pub label: String,
  pub min_minutes: u32,
  /// Exclusive; `None` for the open-ended last bucket.
  pub max_minutes: Option<u32>,
  pub count: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StudentRow {
  pub id: i64,
  pub name: String,
  pub country: Option<String>,
  pub level: Option<String>,
  pub completed_count: usize,
  pub achievement_count: usize,
  pub time_spent_minutes: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ExamStats {
  pub attempts: usize,
  pub average_percent: f64,
  pub pass_rate: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ModuleExamStats {
  pub module_id: i64,
  pub title: Option<String>,
  #[serde(flatten)]
  pub stats: ExamStats,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DistributionShare {
  pub label: String,
  pub count: u64,
  /// 0.0..=1.0 of the distribution total.
  pub share: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct OverviewTab {
  pub stats: OverviewStats,
  pub student_count: usize,
  pub module_count: usize,
  pub total_completions: usize,
  pub exam_attempts: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StudentsTab {
  pub students: Vec<StudentRow>,
  pub achievements: Vec<AchievementGroup>,
  pub time_spent: Vec<TimeBucket>,
  pub top_performers: Vec<TopPerformer>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ModulesTab {
  pub completion: Vec<ModuleCompletion>,
  pub difficult: Vec<DifficultModule>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ExamsTab {
  pub summary: ExamStats,
  pub by_module: Vec<ModuleExamStats>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DemographicsTab {
  pub languages: Vec<DistributionShare>,
  pub countries: Vec<DistributionShare>,
  pub levels: Vec<DistributionShare>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Dashboard {
  pub page: PageChrome,
  pub overview: OverviewTab,
  pub students: StudentsTab,
  pub modules: ModulesTab,
  pub exams: ExamsTab,
  pub engagement: EngagementMetrics,
  pub demographics: DemographicsTab,
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

pub fn module_completion(modules: &[ModuleSummary], students: &[Student]) -> Vec<ModuleCompletion> {
  let total = students.len();
  modules
    .iter()
    .map(|m| {
      let completed_count = students.iter().filter(|s| s.completed_modules.contains(&m.id)).count();
      let completion_rate = if total == 0 { 0.0 } else { completed_count as f64 / total as f64 };
      ModuleCompletion {
        module_id: m.id,
        title: m.title.clone(),
        level: m.level.clone(),
        completed_count,
        completion_rate,
      }
    })
    .collect()
}

/// Count achievements by name; most common first, ties by name.
pub fn group_achievements(students: &[Student]) -> Vec<AchievementGroup> {
  let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
  for a in students.iter().flat_map(|s| s.achievements.iter()) {
    let name = a.name.trim();
    if name.is_empty() { continue; }
    *counts.entry(name).or_default() += 1;
  }
  let mut groups: Vec<AchievementGroup> = counts
    .into_iter()
    .map(|(name, count)| AchievementGroup { name: name.to_string(), count })
    .collect();
  groups.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
  groups
}

fn format_minutes(m: u32) -> String {
  if m >= 60 && m % 60 == 0 { format!("{} h", m / 60) } else { format!("{m} min") }
}

/// Bucket students by time spent. `bounds` are exclusive upper edges in
/// minutes; zero and duplicate bounds are ignored, order does not matter.
pub fn bucket_time_spent(students: &[Student], bounds: &[u32]) -> Vec<TimeBucket> {
  let mut edges: Vec<u32> = bounds.iter().copied().filter(|b| *b > 0).collect();
  edges.sort_unstable();
  edges.dedup();

  let mut buckets = Vec::with_capacity(edges.len() + 1);
  let mut lo = 0u32;
  for hi in &edges {
    buckets.push(TimeBucket {
      label: format!("{}-{}", format_minutes(lo), format_minutes(*hi)),
      min_minutes: lo,
      max_minutes: Some(*hi),
      count: 0,
    });
    lo = *hi;
  }
  buckets.push(TimeBucket { label: format!("{}+", format_minutes(lo)), min_minutes: lo, max_minutes: None, count: 0 });

  for s in students {
    let minutes = s.time_spent_minutes.max(0.0);
    let idx = edges.iter().position(|hi| minutes < f64::from(*hi)).unwrap_or(edges.len());
    buckets[idx].count += 1;
  }
  buckets
}

fn exam_stats<'a>(results: impl Iterator<Item = &'a ExamResult>) -> ExamStats {
  let (mut attempts, mut percent_sum, mut passed) = (0usize, 0.0f64, 0usize);
  for r in results {
    attempts += 1;
    percent_sum += r.percent();
    if r.passed { passed += 1; }
  }
  if attempts == 0 {
    return ExamStats::default();
  }
  ExamStats {
    attempts,
    average_percent: percent_sum / attempts as f64,
    pass_rate: passed as f64 / attempts as f64,
  }
}

pub fn summarize_exams(results: &[ExamResult], modules: &[ModuleSummary]) -> ExamsTab {
  let titles: HashMap<i64, &str> = modules.iter().map(|m| (m.id, m.title.as_str())).collect();
  let mut by_module: BTreeMap<i64, Vec<&ExamResult>> = BTreeMap::new();
  for r in results {
    if let Some(id) = r.module_id {
      by_module.entry(id).or_default().push(r);
    }
  }
  ExamsTab {
    summary: exam_stats(results.iter()),
    by_module: by_module
      .into_iter()
      .map(|(module_id, rs)| ModuleExamStats {
        module_id,
        title: titles.get(&module_id).map(|t| (*t).to_string()),
        stats: exam_stats(rs.into_iter()),
      })
      .collect(),
  }
}

pub fn distribution_shares(entries: &[DistributionEntry]) -> Vec<DistributionShare> {
  let total: u64 = entries.iter().map(|e| e.count).sum();
  entries
    .iter()
    .map(|e| DistributionShare {
      label: e.label.clone(),
      count: e.count,
      share: if total == 0 { 0.0 } else { e.count as f64 / total as f64 },
    })
    .collect()
}

fn student_rows(students: &[Student]) -> Vec<StudentRow> {
  students
    .iter()
    .map(|s| StudentRow {
      id: s.id,
      name: s.name.clone(),
      country: s.country.clone(),
      level: s.level.clone(),
      completed_count: s.completed_modules.len(),
      achievement_count: s.achievements.len(),
      time_spent_minutes: s.time_spent_minutes,
    })
    .collect()
}

/// Merge the ten collections into the dashboard.
pub fn build_dashboard(snap: AnalyticsSnapshot, time_buckets: &[u32], page: PageChrome) -> Dashboard {
  let completion = module_completion(&snap.modules, &snap.students);
  let total_completions = completion.iter().map(|c| c.completed_count).sum();
  let exams = summarize_exams(&snap.exam_results, &snap.modules);

  Dashboard {
    page,
    overview: OverviewTab {
      student_count: snap.students.len(),
      module_count: snap.modules.len(),
      total_completions,
      exam_attempts: exams.summary.attempts,
      stats: snap.overview,
    },
    students: StudentsTab {
      students: student_rows(&snap.students),
      achievements: group_achievements(&snap.students),
      time_spent: bucket_time_spent(&snap.students, time_buckets),
      top_performers: snap.top_performers,
    },
    modules: ModulesTab { completion, difficult: snap.difficult_modules },
    exams,
    engagement: snap.engagement,
    demographics: DemographicsTab {
      languages: distribution_shares(&snap.languages),
      countries: distribution_shares(&snap.countries),
      levels: distribution_shares(&snap.levels),
    },
  }
}
