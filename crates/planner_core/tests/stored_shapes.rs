use chrono::{NaiveDate, Weekday};
use planner_core::store::codec::{decode_record, encode_record};
use planner_core::{
    DailyRecord, DailyRecordRepository, GlobalRecordRepository, MemoryRecordStore,
    MonthlyRecord, RecordStore, WeeklyRecord, YearlyRecord,
};
use serde_json::{json, Value};

fn date(value: &str) -> NaiveDate {
    planner_core::parse_date(value).unwrap()
}

fn stored_json(store: &MemoryRecordStore, key: &str) -> Value {
    let raw = store.get(key).unwrap().expect("key should be stored");
    serde_json::from_str(&raw).unwrap()
}

#[test]
fn daily_record_is_stored_with_camel_case_fields() {
    let store = MemoryRecordStore::new();
    let repo = DailyRecordRepository::new(&store);
    let mut record = DailyRecord::empty(date("2024-03-15"));
    record.today_goal = "focus".to_string();
    record.schedule[0] = "09:00 standup".to_string();
    repo.save(&record).unwrap();

    let value = stored_json(&store, "planner_daily_2024-03-15");
    assert_eq!(value["date"], json!("2024-03-15"));
    assert_eq!(value["todayGoal"], json!("focus"));
    assert_eq!(value["schedule"].as_array().unwrap().len(), 12);
    assert_eq!(value["schedule"][0], json!("09:00 standup"));
    for field in ["todos", "checklist", "memo", "summary"] {
        assert_eq!(value[field], json!(""), "field {field}");
    }
}

#[test]
fn weekly_days_use_short_lowercase_names() {
    let store = MemoryRecordStore::new();
    let repo = GlobalRecordRepository::<_, WeeklyRecord>::new(&store);
    let mut record = WeeklyRecord::default();
    record.days.set(Weekday::Sun, "family");
    record.todo_list = "groceries".to_string();
    repo.save(&record).unwrap();

    let value = stored_json(&store, "planner_weekly");
    assert_eq!(value["days"]["sun"], json!("family"));
    assert_eq!(value["days"]["mon"], json!(""));
    assert_eq!(value["todoList"], json!("groceries"));
    assert_eq!(value["weekGoal"], json!(""));
}

#[test]
fn monthly_and_yearly_slots_are_keyed_by_number() {
    let store = MemoryRecordStore::new();
    let today = date("2024-02-10");

    let monthly_repo = GlobalRecordRepository::<_, MonthlyRecord>::new(&store);
    let mut monthly = MonthlyRecord::for_date(today);
    monthly.set_day_text(29, "leap day").unwrap();
    monthly_repo.save(&monthly).unwrap();

    let yearly_repo = GlobalRecordRepository::<_, YearlyRecord>::new(&store);
    let mut yearly = YearlyRecord::for_date(today);
    yearly.set_month_text(11, "review the year").unwrap();
    yearly_repo.save(&yearly).unwrap();

    let monthly_value = stored_json(&store, "planner_monthly");
    assert_eq!(monthly_value["year"], json!(2024));
    assert_eq!(monthly_value["month"], json!(1));
    assert_eq!(monthly_value["dates"], json!({ "29": "leap day" }));

    let yearly_value = stored_json(&store, "planner_yearly");
    assert_eq!(yearly_value["year"], json!(2024));
    assert_eq!(yearly_value["months"], json!({ "11": "review the year" }));
}

#[test]
fn records_written_by_the_web_planner_load_unchanged() {
    let store = MemoryRecordStore::new();
    store
        .set(
            "planner_monthly",
            r#"{"year":2025,"month":6,"dates":{"1":"a","31":"b","40":"ignored"},"memo":"m"}"#,
        )
        .unwrap();
    store
        .set(
            "planner_yearly",
            r#"{"year":2025,"months":{"0":"jan","11":"dec"}}"#,
        )
        .unwrap();

    let today = date("2024-01-01");
    let monthly = GlobalRecordRepository::<_, MonthlyRecord>::new(&store).load_or_init(today);
    assert_eq!((monthly.year, monthly.month), (2025, 6));
    assert_eq!(monthly.day_text(1), "a");
    assert_eq!(monthly.day_text(31), "b");
    assert_eq!(monthly.memo, "m");

    let yearly = GlobalRecordRepository::<_, YearlyRecord>::new(&store).load_or_init(today);
    assert_eq!(yearly.year, 2025);
    assert_eq!(yearly.month_text(0), "jan");
    assert_eq!(yearly.month_text(11), "dec");
}

#[test]
fn encoded_records_decode_to_equal_values() {
    let mut daily = DailyRecord::empty(date("2024-03-15"));
    daily.summary = "done".to_string();
    daily.schedule[11] = "sleep".to_string();
    let decoded: DailyRecord = decode_record(&encode_record(&daily).unwrap()).unwrap();
    assert_eq!(decoded, daily);

    let mut monthly = MonthlyRecord::for_date(date("2024-03-15"));
    monthly.memo = "notes".to_string();
    monthly.set_day_text(1, "first").unwrap();
    let decoded: MonthlyRecord = decode_record(&encode_record(&monthly).unwrap()).unwrap();
    assert_eq!(decoded, monthly);

    let mut weekly = WeeklyRecord::default();
    weekly.week_goal = "launch".to_string();
    weekly.todo_list = "slides".to_string();
    weekly.days.set(Weekday::Mon, "kickoff");
    weekly.days.set(Weekday::Sun, "rest");
    let decoded: WeeklyRecord = decode_record(&encode_record(&weekly).unwrap()).unwrap();
    assert_eq!(decoded, weekly);

    let mut yearly = YearlyRecord::for_date(date("2024-03-15"));
    yearly.year = 2031;
    yearly.set_month_text(0, "plan").unwrap();
    yearly.set_month_text(11, "review").unwrap();
    let decoded: YearlyRecord = decode_record(&encode_record(&yearly).unwrap()).unwrap();
    assert_eq!(decoded, yearly);
}

#[test]
fn unreadable_global_record_falls_back_to_initial() {
    let store = MemoryRecordStore::new();
    store.set("planner_monthly", r#"{"year":2025,"month":12}"#).unwrap();
    store.set("planner_weekly", "not json").unwrap();

    let today = date("2024-03-15");
    let monthly = GlobalRecordRepository::<_, MonthlyRecord>::new(&store).load_or_init(today);
    assert_eq!(monthly, MonthlyRecord::for_date(today));
    let weekly = GlobalRecordRepository::<_, WeeklyRecord>::new(&store).load_or_init(today);
    assert_eq!(weekly, WeeklyRecord::default());
}
