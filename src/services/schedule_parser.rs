//! Natural-language schedule parsing.
//!
//! Turns a free-form Chinese scheduling request into a structured
//! [`ScheduleDraft`]: absolute start/end timestamps, action content, resource
//! labels and a priority tier. The grammar targets a fixed vocabulary of
//! date/time idioms; anything the resolver cannot read degrades to defaults
//! instead of failing.

use chrono::{Datelike, Duration, Local, Months, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

use crate::error::{AppError, AppResult};
use crate::models::schedule::{Priority, ScheduleDraft, MAX_CONTENT_CHARS};
use crate::services::numerals::{chinese_to_arabic, numeric_token};
use crate::services::vocab::{
    ACTION_VERBS, HIGH_PRIORITY_KEYWORDS, LOW_PRIORITY_KEYWORDS, PERIOD_DEFAULT_HOURS,
    RESOURCE_CATEGORIES,
};

/// Start hour used when no time-of-day phrase is recognized.
const DEFAULT_START_HOUR: u32 = 14;

const SENTENCE_DELIMITERS: &[char] = &['，', '。', '！', '？', '；', '-'];

static RE_RANGE_SEPARATOR: Lazy<Regex> = Lazy::new(|| regex("[到至~-]"));
static RE_NOISE: Lazy<Regex> = Lazy::new(|| regex(r"[^\x{4e00}-\x{9fa5}0-9\s:：-]"));

static RE_TIME_RANGE: Lazy<Regex> = Lazy::new(|| {
    regex(
        r"(上午|下午|中午|晚上)?\s*([零〇一二两三四五六七八九十0-9]{1,3})点(半|[零〇一二三四五六七八九十0-9]{0,3})?分?\s*[-到至~]+\s*([零〇一二两三四五六七八九十0-9]{1,3})点(半|[零〇一二三四五六七八九十0-9]{0,3})?分?",
    )
});

static RE_DATE_YMD: Lazy<Regex> = Lazy::new(|| regex(r"([0-9]{4})年([0-9]{1,2})月([0-9]{1,2})[号日]?"));
static RE_DATE_MD: Lazy<Regex> = Lazy::new(|| regex(r"([0-9]{1,2})月([0-9]{1,2})[号日]"));
static RE_WEEK_AFTER_NEXT: Lazy<Regex> = Lazy::new(|| regex("下下周([一二三四五六七日天])"));
static RE_NEXT_MONTH_DAY: Lazy<Regex> =
    Lazy::new(|| regex(r"下(?:个)?月([零〇一二两三四五六七八九十百]+|[0-9]{1,2})[号日]"));
static RE_NEXT_MONTH_WEEK: Lazy<Regex> =
    Lazy::new(|| regex(r"下(?:个)?月(?:第([一二三四])周)?(?:周|星期|礼拜)([一二三四五六七日天])"));
static RE_NEXT_WEEK: Lazy<Regex> = Lazy::new(|| regex(r"下周(?:星期|礼拜|周)?([一二三四五六七日天])"));
static RE_THIS_WEEK: Lazy<Regex> = Lazy::new(|| regex(r"本(?:个)?(?:星期|礼拜|周)([一二三四五六七日天])"));
static RE_BARE_WEEKDAY: Lazy<Regex> = Lazy::new(|| regex(r"(?:星期|礼拜|周)([一二三四五六七日天])"));
static RE_THIS_MONTH_DAY: Lazy<Regex> = Lazy::new(|| regex(r"本(?:个)?月([0-9]{1,2})[号日]"));

static RE_CJK_HALF: Lazy<Regex> = Lazy::new(|| regex("([零〇一二三四五六七八九十]+)点半"));
static RE_DIGIT_HALF: Lazy<Regex> = Lazy::new(|| regex(r"([0-9]+)点(30|三十|半)分?"));
static RE_CJK_CLOCK: Lazy<Regex> =
    Lazy::new(|| regex("([零〇一二三四五六七八九十]+)点([零〇一二三四五六七八九十]+)?分?"));
static RE_DIGIT_CLOCK: Lazy<Regex> = Lazy::new(|| regex(r"([0-9]{1,2})[:点时]([0-9]{0,2})分?"));

static RE_DURATION: Lazy<Regex> = Lazy::new(|| regex(r"(半|一|两|三|[0-9]+)\s*(小时|分钟|h|min)"));

/// Temporal substrings removed before content extraction, most specific first.
static TIME_STRIP_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"[0-9]{1,2}[:点时][0-9]{0,2}分?\s*-\s*[0-9]{1,2}[:点时][0-9]{0,2}分?",
        r"[零〇一二三四五六七八九十百0-9]{1,3}[点时][:：]?[零〇一二三四五六七八九十百0-9]{0,2}分?\s*[-~至到]?\s*[零〇一二三四五六七八九十百0-9]{1,3}[点时][:：]?[零〇一二三四五六七八九十百0-9]{0,2}分?",
        r"[零〇一二三四五六七八九十百0-9]{1,3}点半",
        r"[零〇一二三四五六七八九十百0-9]{1,3}[点时][:：]?[零〇一二三四五六七八九十百0-9]{0,2}分?",
        r"上午|下午|晚上|中午",
        r"下周(?:星期|礼拜|周)?[一二三四五六七日天]",
        r"本(?:个)?(?:星期|礼拜|周)[一二三四五六七日天]",
        r"(?:星期|礼拜|周)[一二三四五六七日天]",
        r"今天|明天|后天|大后天|下周|下个月|下月|本月|本(?:个)?月|本周|本(?:个)?星期|本礼拜",
        r"预计需要[0-9]+\s*(?:小时|分钟|h|min)",
        r"约?[0-9]+\s*(?:小时|分钟|h|min)(?:左右|钟)?",
    ]
    .iter()
    .map(|pattern| regex(pattern))
    .collect()
});

fn regex(pattern: &str) -> Regex {
    Regex::new(pattern).expect("vocabulary pattern must compile")
}

#[derive(Debug, Default)]
pub struct ScheduleParser;

impl ScheduleParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse `text` against the current wall-clock time.
    pub fn parse(&self, text: &str, executor: &str) -> AppResult<ScheduleDraft> {
        self.parse_at(text, executor, Local::now().naive_local())
    }

    /// Parse `text` with an explicit reference time, so callers and tests can
    /// pin "now".
    pub fn parse_at(
        &self,
        text: &str,
        executor: &str,
        now: NaiveDateTime,
    ) -> AppResult<ScheduleDraft> {
        if text.trim().is_empty() {
            return Err(AppError::validation("输入文本不能为空"));
        }
        if executor.trim().is_empty() {
            return Err(AppError::validation("执行人不能为空"));
        }

        let clean = preprocess(text);

        let (start_at, end_at) = match self.parse_time_range(&clean, now) {
            Some(range) => range,
            None => self.resolve_relative_time(&clean, now),
        };

        let content: String = self
            .extract_content(&clean)
            .chars()
            .take(MAX_CONTENT_CHARS)
            .collect();
        let resource = self.find_resources(&clean).join(",");
        let priority = self.detect_priority(&clean);

        debug!(
            executor,
            %start_at,
            %end_at,
            priority = priority.tier(),
            "parsed schedule text"
        );

        Ok(ScheduleDraft {
            id: None,
            executor: executor.to_string(),
            content,
            start_at,
            end_at,
            resource,
            priority,
            original_start_at: None,
        })
    }

    /// Explicit "3点-5点" style ranges bypass the relative-time resolution
    /// entirely. A range whose computed end does not pass its start wraps to
    /// the next day.
    fn parse_time_range(&self, text: &str, now: NaiveDateTime) -> Option<(NaiveDateTime, NaiveDateTime)> {
        let caps = RE_TIME_RANGE.captures(text)?;
        let period = caps.get(1).map(|m| m.as_str());

        let mut start_hour = numeric_token(&caps[2]) as i32;
        let start_minute = minute_component(caps.get(3).map(|m| m.as_str()));
        let mut end_hour = numeric_token(&caps[4]) as i32;
        let end_minute = minute_component(caps.get(5).map(|m| m.as_str()));

        match period {
            Some("下午") | Some("晚上") if start_hour < 12 => {
                start_hour += 12;
                if end_hour < 12 {
                    end_hour += 12;
                }
            }
            Some("中午") => {
                if start_hour < 11 {
                    start_hour += 12;
                }
                if end_hour < 11 {
                    end_hour += 12;
                }
            }
            _ => {}
        }

        let base = self.resolve_base_date(text, now);
        let start = clock_on(base, start_hour, start_minute)?;
        let mut end = clock_on(base, end_hour, end_minute)?;
        if end <= start {
            end += Duration::days(1);
        }
        Some((start, end))
    }

    /// Base-date precedence, first match wins, most specific first.
    fn resolve_base_date(&self, text: &str, now: NaiveDateTime) -> NaiveDate {
        let today = now.date();

        if let Some(caps) = RE_DATE_YMD.captures(text) {
            let year: i32 = caps[1].parse().unwrap_or_else(|_| today.year());
            let month: u32 = caps[2].parse().unwrap_or(1);
            let day: u32 = caps[3].parse().unwrap_or(1);
            return date_with_day_overflow(year, month, day, today);
        }

        if let Some(caps) = RE_DATE_MD.captures(text) {
            let month: u32 = caps[1].parse().unwrap_or(1);
            let day: u32 = caps[2].parse().unwrap_or(1);
            let year = today.year() + i32::from(month < today.month());
            return date_with_day_overflow(year, month, day, today);
        }

        if text.contains("下下周") || text.contains("下下个星期") {
            let base = today + Duration::days(7);
            if let Some(caps) = RE_WEEK_AFTER_NEXT.captures(text) {
                let target = weekday_index(&caps[1]) as i64;
                let delta = target - i64::from(base.weekday().num_days_from_monday()) + 7;
                return base + Duration::days(delta);
            }
            return base;
        }

        if text.contains("下个月") || text.contains("下月") {
            let next_month = today
                .checked_add_months(Months::new(1))
                .unwrap_or(today);

            if let Some(caps) = RE_NEXT_MONTH_DAY.captures(text) {
                let max_day = crate::services::schedule_utils::days_in_month(
                    next_month.year(),
                    next_month.month(),
                );
                let day = numeric_token(&caps[1]).clamp(1, max_day);
                return NaiveDate::from_ymd_opt(next_month.year(), next_month.month(), day)
                    .unwrap_or(next_month);
            }

            if let Some(caps) = RE_NEXT_MONTH_WEEK.captures(text) {
                let target = weekday_index(&caps[2]);
                let first_day = next_month.with_day(1).unwrap_or(next_month);
                let first_weekday = first_day.weekday().num_days_from_monday();
                let week_offset = caps
                    .get(1)
                    .map(|week| (chinese_to_arabic(week.as_str()).max(1) - 1) * 7)
                    .unwrap_or(0);
                let delta = (target + 7 - first_weekday) % 7 + week_offset;
                return first_day + Duration::days(i64::from(delta));
            }

            return next_month.with_day(1).unwrap_or(next_month);
        }

        if let Some(caps) = RE_NEXT_WEEK.captures(text) {
            let target = weekday_index(&caps[1]) as i64;
            let delta = target - i64::from(today.weekday().num_days_from_monday()) + 7;
            return today + Duration::days(delta);
        }

        if let Some(caps) = RE_THIS_WEEK.captures(text) {
            let target = weekday_index(&caps[1]) as i64;
            let delta = target - i64::from(today.weekday().num_days_from_monday());
            return today + Duration::days(delta);
        }

        if let Some(caps) = RE_BARE_WEEKDAY.captures(text) {
            let target = weekday_index(&caps[1]) as i64;
            let delta = target - i64::from(today.weekday().num_days_from_monday());
            return today + Duration::days(delta);
        }

        if let Some(caps) = RE_THIS_MONTH_DAY.captures(text) {
            let day: u32 = caps[1].parse().unwrap_or(1);
            return NaiveDate::from_ymd_opt(today.year(), today.month(), day).unwrap_or_else(|| {
                let first = today.with_day(1).unwrap_or(today);
                first + Duration::days(i64::from(day) - 1)
            });
        }

        // Relative day keywords, kept in the original check order: 后天 is
        // tested before 大后天 and therefore shadows it.
        if text.contains('今') {
            return today;
        }
        if text.contains('明') {
            return today + Duration::days(1);
        }
        if text.contains("后天") {
            return today + Duration::days(2);
        }
        if text.contains("大后天") {
            return today + Duration::days(3);
        }

        today
    }

    fn resolve_relative_time(&self, text: &str, now: NaiveDateTime) -> (NaiveDateTime, NaiveDateTime) {
        let base = self.resolve_base_date(text, now);
        let (hour, minute) = resolve_exact_time(text);

        let start = clock_on(base, hour, minute).unwrap_or_else(|| {
            warn!(hour, minute, "resolved clock out of range, using default start");
            base.and_hms_opt(DEFAULT_START_HOUR, 0, 0)
                .expect("default start must be a valid clock time")
        });

        let duration_hours = parse_duration(text).unwrap_or(1.0);
        let mut duration_minutes = (duration_hours * 60.0).round() as i64;
        if duration_minutes <= 0 {
            warn!(duration_hours, "non-positive duration, using one hour");
            duration_minutes = 60;
        }
        (start, start + Duration::minutes(duration_minutes))
    }

    /// Content is the run of characters from the first recognized action verb
    /// to the next sentence delimiter. Without an action verb, fall back to
    /// the temporal-stripped text with resource words removed.
    fn extract_content(&self, text: &str) -> String {
        if let Some(start) = find_first_action_verb(text) {
            let tail = &text[start..];
            let end = tail.find(SENTENCE_DELIMITERS).unwrap_or(tail.len());
            return tail[..end].to_string();
        }

        let mut stripped = text.to_string();
        for pattern in TIME_STRIP_PATTERNS.iter() {
            stripped = pattern.replace_all(&stripped, "").into_owned();
        }
        strip_resource_words(&stripped).trim().to_string()
    }

    fn find_resources(&self, text: &str) -> Vec<String> {
        let mut found: Vec<String> = Vec::new();
        for (_, words) in RESOURCE_CATEGORIES {
            for word in *words {
                if text.contains(word) && !found.iter().any(|seen| seen == word) {
                    found.push((*word).to_string());
                }
            }
        }
        found
    }

    fn detect_priority(&self, text: &str) -> Priority {
        let lowered = text.to_lowercase();
        if HIGH_PRIORITY_KEYWORDS.iter().any(|kw| lowered.contains(kw)) {
            return Priority::High;
        }
        if LOW_PRIORITY_KEYWORDS.iter().any(|kw| lowered.contains(kw)) {
            return Priority::Low;
        }
        Priority::Medium
    }
}

/// Normalize range separators to `-` and drop everything that is not a CJK
/// ideograph, digit, whitespace, colon or dash.
fn preprocess(text: &str) -> String {
    let normalized = RE_RANGE_SEPARATOR.replace_all(text, "-");
    RE_NOISE.replace_all(&normalized, "").trim().to_string()
}

/// Exact time of day, checked most specific first. Returns an hour that may
/// still be out of range after period adjustment; the caller validates.
fn resolve_exact_time(text: &str) -> (i32, u32) {
    if let Some(caps) = RE_CJK_HALF.captures(text) {
        let hour = adjust_period(text, chinese_to_arabic(&caps[1]) as i32);
        return (hour, 30);
    }

    if let Some(caps) = RE_DIGIT_HALF.captures(text) {
        let raw: i32 = caps[1].parse().unwrap_or(DEFAULT_START_HOUR as i32);
        return (adjust_period(text, raw), 30);
    }

    if let Some(caps) = RE_CJK_CLOCK.captures(text) {
        let hour = adjust_period(text, chinese_to_arabic(&caps[1]) as i32);
        let minute = caps
            .get(2)
            .map(|m| chinese_to_arabic(m.as_str()))
            .unwrap_or(0);
        return (hour, minute);
    }

    if let Some(caps) = RE_DIGIT_CLOCK.captures(text) {
        let mut hour: i32 = caps[1].parse().unwrap_or(DEFAULT_START_HOUR as i32);
        let minute: u32 = match caps.get(2).map(|m| m.as_str()) {
            Some(raw) if !raw.is_empty() => raw.parse().unwrap_or(0),
            _ => 0,
        };
        if hour <= 12 {
            if (text.contains("下午") || text.contains("晚上") || text.contains('晚')) && hour < 12 {
                hour += 12;
            } else if text.contains("中午") && hour < 12 {
                hour = 12;
            } else if text.contains("凌晨") && hour >= 6 {
                hour -= 12;
            }
        }
        return (hour, minute);
    }

    for (keywords, default_hour) in PERIOD_DEFAULT_HOURS {
        if keywords.iter().any(|kw| text.contains(kw)) {
            return (*default_hour as i32, 0);
        }
    }

    (DEFAULT_START_HOUR as i32, 0)
}

fn adjust_period(text: &str, mut hour: i32) -> i32 {
    if text.contains("下午") || text.contains("晚上") {
        if hour < 12 {
            hour += 12;
        }
    } else if text.contains("中午") {
        hour = 12;
    } else if text.contains("凌晨") && hour >= 6 {
        hour -= 12;
    }
    hour
}

fn minute_component(token: Option<&str>) -> u32 {
    match token {
        Some("半") => 30,
        Some(raw) => numeric_token(raw),
        None => 0,
    }
}

fn clock_on(base: NaiveDate, hour: i32, minute: u32) -> Option<NaiveDateTime> {
    if !(0..24).contains(&hour) || minute >= 60 {
        return None;
    }
    base.and_hms_opt(hour as u32, minute, 0)
}

fn parse_duration(text: &str) -> Option<f64> {
    let caps = RE_DURATION.captures(text)?;
    let amount = match &caps[1] {
        "半" => 0.5,
        "一" => 1.0,
        "两" => 2.0,
        "三" => 3.0,
        digits => digits.parse().unwrap_or(1.0),
    };
    Some(match &caps[2] {
        "小时" | "h" => amount,
        _ => amount / 60.0,
    })
}

fn find_first_action_verb(text: &str) -> Option<usize> {
    text.char_indices().find_map(|(idx, _)| {
        let rest = &text[idx..];
        ACTION_VERBS
            .iter()
            .any(|verb| rest.starts_with(verb))
            .then_some(idx)
    })
}

fn strip_resource_words(text: &str) -> String {
    let mut result = text.to_string();
    for (_, words) in RESOURCE_CATEGORIES {
        for word in *words {
            if result.contains(word) {
                result = result.replace(word, "");
            }
        }
    }
    result
}

/// Resolve a calendar day that may not exist in its month (e.g. 2月30号) the
/// lenient way: first of the month plus the day offset.
fn date_with_day_overflow(year: i32, month: u32, day: u32, fallback: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_else(|| {
        NaiveDate::from_ymd_opt(year, month, 1)
            .map(|first| first + Duration::days(i64::from(day) - 1))
            .unwrap_or(fallback)
    })
}

fn weekday_index(symbol: &str) -> u32 {
    match symbol {
        "一" => 0,
        "二" => 1,
        "三" => 2,
        "四" => 3,
        "五" => 4,
        "六" => 5,
        "日" | "天" => 6,
        _ => 0,
    }
}
