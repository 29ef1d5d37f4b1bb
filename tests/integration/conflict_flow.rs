use chrono::{NaiveDate, NaiveDateTime};
use smartsched::models::schedule::{Priority, ScheduleDraft};
use smartsched::services::conflict::check_conflicts;
use smartsched::services::schedule_parser::ScheduleParser;

fn dt(day: u32, hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 3, day)
        .expect("valid date")
        .and_hms_opt(hour, minute, 0)
        .expect("valid time")
}

fn persisted(
    id: &str,
    executor: &str,
    content: &str,
    resource: &str,
    priority: Priority,
    start: NaiveDateTime,
    end: NaiveDateTime,
) -> ScheduleDraft {
    ScheduleDraft {
        id: Some(id.into()),
        executor: executor.into(),
        content: content.into(),
        start_at: start,
        end_at: end,
        resource: resource.into(),
        priority,
        original_start_at: None,
    }
}

#[test]
fn inserting_over_a_booked_resource_is_reported() {
    let existing = vec![persisted(
        "1",
        "u1",
        "召开部门例会",
        "会议室",
        Priority::High,
        dt(10, 15, 30),
        dt(10, 16, 30),
    )];

    // The parsed request wants the same room in an overlapping slot.
    let new_draft = ScheduleParser::new()
        .parse_at("下午3点-5点在会议室准备项目评审材料", "u2", dt(10, 9, 0))
        .expect("parse");
    assert_eq!(new_draft.resource, "会议室");

    let conflicts = check_conflicts(&existing, &new_draft);
    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0].content, "召开部门例会");
    assert_eq!(conflicts[0].executor, "u1");
    assert_eq!(conflicts[0].start_at, dt(10, 15, 30));
}

#[test]
fn same_executor_collides_without_shared_resource() {
    let existing = vec![persisted(
        "1",
        "u1",
        "实验课",
        "实验室",
        Priority::Medium,
        dt(10, 15, 0),
        dt(10, 17, 0),
    )];

    let new_draft = ScheduleParser::new()
        .parse_at("下午3点-5点准备项目评审材料", "u1", dt(10, 9, 0))
        .expect("parse");
    assert_eq!(new_draft.resource, "");

    assert_eq!(check_conflicts(&existing, &new_draft).len(), 1);
}

#[test]
fn disjoint_insert_is_accepted_silently() {
    let existing = vec![
        persisted(
            "1",
            "u1",
            "召开部门例会",
            "会议室",
            Priority::High,
            dt(10, 9, 0),
            dt(10, 10, 0),
        ),
        persisted(
            "2",
            "u1",
            "面试",
            "会客室",
            Priority::Medium,
            dt(11, 15, 0),
            dt(11, 16, 0),
        ),
    ];

    let new_draft = ScheduleParser::new()
        .parse_at("下午3点-5点在会议室准备项目评审材料", "u2", dt(10, 8, 0))
        .expect("parse");

    assert!(check_conflicts(&existing, &new_draft).is_empty());
}

#[test]
fn conflict_reports_serialize_for_the_caller() {
    let existing = vec![persisted(
        "1",
        "u1",
        "召开部门例会",
        "会议室",
        Priority::High,
        dt(10, 15, 30),
        dt(10, 16, 30),
    )];
    let new_draft = ScheduleParser::new()
        .parse_at("下午3点-5点在会议室准备项目评审材料", "u2", dt(10, 9, 0))
        .expect("parse");

    let conflicts = check_conflicts(&existing, &new_draft);
    let json = serde_json::to_value(&conflicts).expect("serialize");
    assert_eq!(json[0]["startAt"], "2025-03-10 15:30:00");
    assert_eq!(json[0]["resource"], "会议室");
}
