use chrono::{NaiveDate, NaiveDateTime};
use smartsched::models::schedule::{Priority, ScheduleDraft};
use smartsched::services::schedule_parser::ScheduleParser;

// Monday, mid-morning: every relative phrase below resolves against this.
fn now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 3, 10)
        .expect("valid date")
        .and_hms_opt(10, 30, 0)
        .expect("valid time")
}

fn dt(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .expect("valid date")
        .and_hms_opt(hour, minute, 0)
        .expect("valid time")
}

fn parse(text: &str, executor: &str) -> ScheduleDraft {
    ScheduleParser::new()
        .parse_at(text, executor, now())
        .expect("parse should succeed")
}

#[test]
fn explicit_afternoon_range() {
    let draft = parse("下午3点-5点准备项目评审材料", "u1");
    assert_eq!(draft.executor, "u1");
    assert_eq!(draft.start_at, dt(2025, 3, 10, 15, 0));
    assert_eq!(draft.end_at, dt(2025, 3, 10, 17, 0));
    assert!(draft.content.contains("准备项目评审材料"));
    assert_eq!(draft.resource, "");
    assert_eq!(draft.priority, Priority::Medium);
    assert!(draft.original_start_at.is_none());
}

#[test]
fn range_is_independent_of_reference_time() {
    let parser = ScheduleParser::new();
    let earlier = parser
        .parse_at("下午3点-5点准备项目评审材料", "u1", dt(2025, 3, 10, 8, 0))
        .expect("parse");
    let later = parser
        .parse_at("下午3点-5点准备项目评审材料", "u1", dt(2025, 3, 10, 20, 0))
        .expect("parse");
    assert_eq!(earlier.start_at, later.start_at);
    assert_eq!(earlier.end_at, later.end_at);
}

#[test]
fn tomorrow_morning_chinese_numeral() {
    let draft = parse("明天上午十点提交季度报告给财务部", "u2");
    assert_eq!(draft.start_at, dt(2025, 3, 11, 10, 0));
    assert_eq!(draft.end_at, dt(2025, 3, 11, 11, 0));
    assert_eq!(draft.content, "提交季度报告给财务部");
}

#[test]
fn bare_action_request_gets_defaults() {
    let draft = parse("处理客户投诉，需要调取合同资料", "u3");
    assert_eq!(draft.start_at, dt(2025, 3, 10, 14, 0));
    assert_eq!(draft.end_at, dt(2025, 3, 10, 15, 0));
    assert!(draft.content.starts_with("处理客户投诉"));
    assert_eq!(draft.resource, "资料,合同");
    assert_eq!(draft.priority, Priority::Medium);
}

#[test]
fn colon_clock_reads_start_only() {
    // The 点-style range is the only bypass; a colon range reads its first
    // clock value and takes the default duration.
    let draft = parse("下周日14:30-16:00参观产品需求讨论会", "u4");
    assert_eq!(draft.start_at, dt(2025, 3, 23, 14, 30));
    assert_eq!(draft.end_at, dt(2025, 3, 23, 15, 30));
}

#[test]
fn urgency_keyword_raises_priority() {
    let draft = parse("紧急！今天下班前必须完成系统测试", "u5");
    assert_eq!(draft.priority, Priority::High);
    assert_eq!(draft.start_at.date(), now().date());
    assert_eq!(draft.content, "完成系统测试");
}

#[test]
fn explicit_duration_phrase() {
    let draft = parse("检查实验室样品质量，预计需要2小时", "u6");
    assert_eq!(draft.start_at, dt(2025, 3, 10, 14, 0));
    assert_eq!(draft.end_at, dt(2025, 3, 10, 16, 0));
    assert!(draft.content.starts_with("检查实验室样品质量"));
    assert_eq!(draft.resource, "实验室,样品");
}

#[test]
fn next_month_day_of_month() {
    let draft = parse("下个月24日下午和开发团队进行圣诞活动策划", "u7");
    assert_eq!(draft.start_at, dt(2025, 4, 24, 14, 0));
    assert!(draft.content.contains("圣诞活动策划"));
}

#[test]
fn next_month_nth_weekday() {
    let draft = parse("下个月第一周周三上午10点团队会议", "u8");
    assert_eq!(draft.start_at, dt(2025, 4, 2, 10, 0));
    assert!(draft.content.contains("团队会议"));
}

#[test]
fn week_after_next() {
    let draft = parse("下下周一下午4点客户演示", "u9");
    assert_eq!(draft.start_at, dt(2025, 3, 24, 16, 0));
}

#[test]
fn next_week() {
    let draft = parse("下周一下午4点客户演示", "u9");
    assert_eq!(draft.start_at, dt(2025, 3, 17, 16, 0));
}

#[test]
fn this_month_day_with_morning_default() {
    let draft = parse("本月15号上午体检", "u10");
    assert_eq!(draft.start_at, dt(2025, 3, 15, 9, 0));
    assert_eq!(draft.end_at, dt(2025, 3, 15, 10, 0));
    assert_eq!(draft.content, "体检");
}

#[test]
fn passed_month_rolls_to_next_year() {
    // February is behind the March reference date, and 2026-02-29 does not
    // exist: the day offset lands on March 1st.
    let draft = parse("2月29号下午部门总结", "u11");
    assert_eq!(draft.start_at, dt(2026, 3, 1, 14, 0));
}

#[test]
fn every_draft_keeps_a_positive_interval() {
    let corpus = [
        "下午3点-5点准备项目评审材料",
        "明天上午十点提交季度报告给财务部",
        "处理客户投诉，需要调取合同资料",
        "下周日14:30-16:00参观产品需求讨论会",
        "紧急！今天下班前必须完成系统测试",
        "检查实验室样品质量，预计需要2小时",
        "下个月24日下午和开发团队进行圣诞活动策划",
        "下个月第一周周三上午10点团队会议",
        "下下周一下午4点客户演示",
        "本月15号上午体检",
        "2月29号下午部门总结",
        "晚上11点到1点值班",
    ];
    for text in corpus {
        let draft = parse(text, "u1");
        assert!(draft.end_at > draft.start_at, "interval collapsed for {text}");
        assert!(draft.content.chars().count() <= 256);
    }
}

#[test]
fn parse_is_deterministic_for_a_pinned_reference_time() {
    let first = parse("明天上午十点提交季度报告给财务部", "u2");
    let second = parse("明天上午十点提交季度报告给财务部", "u2");
    assert_eq!(first, second);
}

#[test]
fn blank_input_is_a_validation_error() {
    let parser = ScheduleParser::new();
    assert!(parser.parse_at("", "u1", now()).is_err());
    assert!(parser.parse_at("  \t ", "u1", now()).is_err());
    assert!(parser.parse_at("明天开会", " ", now()).is_err());
}

#[test]
fn drafts_serialize_with_wire_timestamps() {
    let draft = parse("下午3点-5点准备项目评审材料", "u1");
    let json = serde_json::to_value(&draft).expect("serialize");
    assert_eq!(json["startAt"], "2025-03-10 15:00:00");
    assert_eq!(json["endAt"], "2025-03-10 17:00:00");
    assert_eq!(json["priority"], 2);
}
