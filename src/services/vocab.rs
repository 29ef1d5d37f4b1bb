//! Fixed vocabularies backing the parser.
//!
//! These are read-only configuration: built once per process, never mutated.

use std::collections::HashMap;

use once_cell::sync::Lazy;

/// Action verbs recognized as the head of a schedule content phrase.
pub const ACTION_VERBS: &[&str] = &[
    "准备", "完成", "提交", "讨论", "进行", "检查", "安排", "参加", "召开",
    "处理", "审核", "编写", "修改", "审批", "汇报", "评估", "测试", "部署",
    "开发", "设计", "培训", "学习", "研究", "分析", "采购", "签约", "谈判",
    "接待", "拜访", "演示", "发布", "维护", "优化", "调试", "安装", "配置",
    "跟进", "协调", "沟通", "确认", "批准", "签署", "归档", "备份", "恢复",
    "翻译", "校对", "排版", "印刷", "配送", "验收", "结算", "报销", "统计",
    "调查", "考核", "面试", "招聘", "离职", "入职", "转正", "晋升", "调岗",
    "授课", "备课", "听课", "评课", "说课", "试讲", "辅导", "答疑", "批改",
    "阅卷", "监考", "出题", "命题", "组卷", "评分", "录分", "讲解", "示范",
    "指导", "预习", "复习", "背诵", "默写", "朗读", "阅读", "做题", "练习",
    "实验", "实践", "研讨", "答辩", "展示", "参赛", "考证", "考研", "留学",
    "交流", "访学", "考勤", "查寝", "值日", "评比", "表彰", "处分", "约谈",
    "家访", "建档", "评优", "保研", "评教", "选课", "调课", "排课", "代课",
    "补考", "重修", "休学", "复学", "升旗", "集会", "排练", "演出", "竞赛",
    "义诊", "义卖", "捐赠", "支教", "调研", "实习", "实训", "见习", "军训",
    "拉练", "体检", "接种", "防疫", "疏散", "演练",
];

/// Resource dictionary, categorized. Matching is plain substring containment.
pub const RESOURCE_CATEGORIES: &[(&str, &[&str])] = &[
    (
        "location",
        &[
            "会议室", "会客室", "洽谈室", "咖啡厅", "餐厅", "实验室", "车间",
            "工位", "A区", "B区", "C区", "总部", "分部", "基地", "教室",
            "阶梯教室", "多媒体教室", "计算机房", "语音室", "琴房", "画室",
            "舞蹈房", "体育馆", "操场", "篮球场", "图书馆", "阅览室", "自习室",
            "报告厅", "礼堂", "校医院", "食堂", "宿舍", "辅导员办公室",
            "教务处", "学生处", "招生办",
        ],
    ),
    (
        "device",
        &[
            "电脑", "笔记本", "台式机", "平板", "投影仪", "显示屏", "服务器",
            "手机", "电话", "打印机", "复印机", "扫描仪", "传真机", "路由器",
            "黑板", "白板", "投影幕", "讲台", "课桌椅", "实验器材", "显微镜",
            "天平", "钢琴", "画架", "体育器材", "教学电脑", "电钢琴",
            "舞蹈把杆", "校园卡", "一卡通", "广播系统", "监控设备", "电子班牌",
            "班班通",
        ],
    ),
    (
        "material",
        &[
            "资料", "文件", "文档", "合同", "协议", "标书", "样品", "原型",
            "U盘", "硬盘", "设计稿", "图纸", "报告", "报表", "统计数据",
            "教材", "教参", "教案", "课件", "学案", "试卷", "答题卡", "成绩单",
            "作业本", "实验报告", "毕业论文", "学位论文", "教学计划", "课表",
            "考勤表", "学生档案", "录取通知书", "毕业证书", "奖学金证书",
            "竞赛奖状",
        ],
    ),
];

/// High-urgency wins over low-urgency; no hit means medium.
pub const HIGH_PRIORITY_KEYWORDS: &[&str] = &["紧急", "立刻", "马上", "尽快", "务必", "必须"];
pub const LOW_PRIORITY_KEYWORDS: &[&str] = &["有空", "抽空", "不着急", "闲暇时", "非紧急"];

/// Fallback start hours for bare period-of-day mentions, checked in order.
pub const PERIOD_DEFAULT_HOURS: &[(&[&str], u32)] = &[
    (&["早上", "上午", "早晨"], 9),
    (&["中午"], 12),
    (&["下午"], 14),
    (&["晚上", "傍晚", "晚"], 19),
];

/// Canonical Chinese numeral tokens for clock values.
pub static CHINESE_NUM_MAP: Lazy<HashMap<&'static str, u32>> = Lazy::new(|| {
    HashMap::from([
        ("零", 0),
        ("〇", 0),
        ("一", 1),
        ("两", 2),
        ("二", 2),
        ("三", 3),
        ("四", 4),
        ("五", 5),
        ("六", 6),
        ("七", 7),
        ("八", 8),
        ("九", 9),
        ("十", 10),
        ("十一", 11),
        ("十二", 12),
        ("十三", 13),
        ("十四", 14),
        ("十五", 15),
        ("十六", 16),
        ("十七", 17),
        ("十八", 18),
        ("十九", 19),
        ("二十", 20),
        ("二十一", 21),
        ("二十二", 22),
        ("二十三", 23),
    ])
});
