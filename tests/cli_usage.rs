use predicates::prelude::*;

#[test]
fn no_subcommand_prints_usage() {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("duscrape");
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn help_lists_every_scraper() {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("duscrape");
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("athletics"))
        .stdout(predicate::str::contains("bulletin"))
        .stdout(predicate::str::contains("calendar"));
}

#[test]
fn invalid_month_window_is_rejected_before_any_fetch() {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("duscrape");
    cmd.args(["calendar", "--start-month", "13"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("months must be within 1-12"));
}

#[test]
fn reversed_month_window_is_rejected() {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("duscrape");
    cmd.args(["calendar", "--start-month", "9", "--end-month", "3"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("start month 9 is after end month 3"));
}
