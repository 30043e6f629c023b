mod common;

use garajhub_db::Database;
use garajhub_types::{MemberStatus, pagination};

use common::{new_startup, test_db};

fn request_rows(db: &Database) -> i64 {
    db.with_conn(|conn| {
        Ok(conn.query_row("SELECT COUNT(*) FROM startup_members", [], |r| r.get(0))?)
    })
    .unwrap()
}

#[test]
fn repeated_request_returns_same_id() {
    let (_dir, db) = test_db();
    let startup = db.create_startup(&new_startup("team", 1)).unwrap();

    let first = db.add_startup_member(startup, 20).unwrap();
    let second = db.add_startup_member(startup, 20).unwrap();

    assert_eq!(first, second);
    assert_eq!(request_rows(&db), 1);
}

#[test]
fn repeated_request_keeps_status() {
    let (_dir, db) = test_db();
    let startup = db.create_startup(&new_startup("team", 1)).unwrap();
    let id = db.add_startup_member(startup, 20).unwrap();
    db.update_join_request(id, MemberStatus::Accepted).unwrap();

    assert_eq!(db.add_startup_member(startup, 20).unwrap(), id);
    let request = db.get_join_request(id).unwrap().unwrap();
    assert_eq!(request.status, MemberStatus::Accepted);
}

#[test]
fn new_request_is_pending() {
    let (_dir, db) = test_db();
    let startup = db.create_startup(&new_startup("team", 1)).unwrap();
    let id = db.add_startup_member(startup, 20).unwrap();

    let request = db.get_join_request(id).unwrap().unwrap();
    assert_eq!(request.startup_id, startup);
    assert_eq!(request.user_id, 20);
    assert_eq!(request.status, MemberStatus::Pending);
    assert!(db.get_join_request(id + 100).unwrap().is_none());
}

#[test]
fn join_request_id_lookup() {
    let (_dir, db) = test_db();
    let startup = db.create_startup(&new_startup("team", 1)).unwrap();
    let id = db.add_startup_member(startup, 20).unwrap();

    assert_eq!(db.get_join_request_id(startup, 20).unwrap(), Some(id));
    assert_eq!(db.get_join_request_id(startup, 21).unwrap(), None);
    assert_eq!(db.get_join_request_id(startup + 1, 20).unwrap(), None);
}

#[test]
fn same_user_may_request_different_startups() {
    let (_dir, db) = test_db();
    let a = db.create_startup(&new_startup("a", 1)).unwrap();
    let b = db.create_startup(&new_startup("b", 1)).unwrap();

    let ra = db.add_startup_member(a, 20).unwrap();
    let rb = db.add_startup_member(b, 20).unwrap();

    assert_ne!(ra, rb);
    assert_eq!(request_rows(&db), 2);
}

#[test]
fn only_accepted_members_are_listed() {
    let (_dir, db) = test_db();
    let startup = db.create_startup(&new_startup("team", 1)).unwrap();
    for (id, name) in [(20, "aziz"), (21, "bobur"), (22, "dilnoza")] {
        db.save_user(id, Some(name), name).unwrap();
    }

    let accepted = db.add_startup_member(startup, 20).unwrap();
    db.add_startup_member(startup, 21).unwrap();
    let rejected = db.add_startup_member(startup, 22).unwrap();
    db.update_join_request(accepted, MemberStatus::Accepted).unwrap();
    db.update_join_request(rejected, MemberStatus::Rejected).unwrap();

    let members = db
        .get_startup_members(startup, 1, pagination::MEMBERS_PER_PAGE)
        .unwrap();
    assert_eq!(members.total, 1);
    assert_eq!(members.items.len(), 1);
    assert_eq!(members.items[0].user_id, 20);
    assert_eq!(members.items[0].username.as_deref(), Some("aziz"));

    assert_eq!(db.get_all_startup_members(startup).unwrap(), [20]);
}

#[test]
fn member_pages() {
    let (_dir, db) = test_db();
    let startup = db.create_startup(&new_startup("team", 1)).unwrap();
    for user_id in 100..107 {
        db.save_user(user_id, None, "member").unwrap();
        let request = db.add_startup_member(startup, user_id).unwrap();
        db.update_join_request(request, MemberStatus::Accepted).unwrap();
    }

    let first = db.get_startup_members(startup, 1, 5).unwrap();
    let second = db.get_startup_members(startup, 2, 5).unwrap();
    assert_eq!(first.items.len(), 5);
    assert_eq!(second.items.len(), 2);
    assert_eq!(first.total, 7);
    assert_eq!(second.total, 7);
    assert_eq!(second.items[1].user_id, 106);

    assert_eq!(db.get_all_startup_members(startup).unwrap().len(), 7);
}

#[test]
fn accepted_member_without_profile_is_not_listed() {
    let (_dir, db) = test_db();
    let startup = db.create_startup(&new_startup("team", 1)).unwrap();
    let request = db.add_startup_member(startup, 55).unwrap();
    db.update_join_request(request, MemberStatus::Accepted).unwrap();

    let members = db.get_startup_members(startup, 1, 5).unwrap();
    assert!(members.is_empty());
    assert_eq!(members.total, 0);

    // The broadcast roster does not need a profile.
    assert_eq!(db.get_all_startup_members(startup).unwrap(), [55]);
}

#[test]
fn request_needs_no_saved_user_or_startup() {
    let (_dir, db) = test_db();

    let id = db.add_startup_member(900, 7).unwrap();

    assert_eq!(db.get_join_request_id(900, 7).unwrap(), Some(id));
    assert_eq!(db.fail_soft().add_startup_member(900, 7), Some(id));
}
