//! The process-wide guard. Kept in its own test binary since the guard can be set only once.

use lexicon_guard::global;
use lexicon_guard::{Guard, GuardOptions, KeywordSet};

#[test]
fn test_install_check_and_reload() {
    let keywords = KeywordSet::try_from_iter(["去你妈的", "加微信"]).unwrap();
    assert!(global::install(Guard::from_keywords(&keywords, GuardOptions::new())).is_ok());

    // a second install is handed back untouched
    let rejected = global::install(Guard::from_keywords(&KeywordSet::new(), GuardOptions::new()));
    assert!(rejected.is_err());

    assert!(global::check("你去你妈的吗").unwrap());
    assert!(global::check("请加微信").unwrap());
    assert!(!global::check("写得真好").unwrap());

    let generation = global::reload(&KeywordSet::try_from_iter(["刷单"]).unwrap()).unwrap();
    assert_eq!(generation, 2);
    assert!(global::check("兼职刷单").unwrap());
    assert!(!global::check("请加微信").unwrap());

    assert_eq!(global::global().unwrap().generation(), 2);
}
