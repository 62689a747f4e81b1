use lumina::db::Database;
use lumina::models::*;
use speculate2::speculate;

fn create_test_user(db: &Database, email: &str) -> User {
    db.create_user(email, "$argon2id$test-hash")
        .expect("Failed to create user")
        .expect("Email already taken")
}

speculate! {
    before {
        let db = Database::open_memory().expect("Failed to create in-memory database");
        db.migrate().expect("Failed to run migrations");
    }

    describe "users" {
        describe "create_user" {
            it "assigns sequential ids" {
                let first = create_test_user(&db, "a@x.com");
                let second = create_test_user(&db, "b@x.com");

                assert_eq!(first.id, 1);
                assert_eq!(second.id, 2);
                assert_eq!(second.email, "b@x.com");
            }

            it "returns None for a taken email" {
                create_test_user(&db, "a@x.com");

                let result = db.create_user("a@x.com", "other").expect("Query failed");

                assert!(result.is_none());
                assert_eq!(db.count_users_with_email("a@x.com").unwrap(), 1);
            }
        }

        describe "find_user_by_email" {
            it "returns None for an unknown email" {
                let result = db.find_user_by_email("nobody@x.com").expect("Query failed");
                assert!(result.is_none());
            }

            it "returns the stored hash" {
                let created = create_test_user(&db, "a@x.com");

                let found = db.find_user_by_email("a@x.com")
                    .expect("Query failed")
                    .expect("User not found");

                assert_eq!(found.id, created.id);
                assert_eq!(found.password_hash, "$argon2id$test-hash");
                assert_eq!(User::from(found), created);
            }

            it "matches case-sensitively" {
                create_test_user(&db, "a@x.com");

                let result = db.find_user_by_email("A@X.COM").expect("Query failed");
                assert!(result.is_none());
            }
        }
    }

    describe "notes" {
        describe "create_note" {
            it "stores title and content" {
                let user = create_test_user(&db, "a@x.com");

                let note = db.create_note(user.id, NoteInput::new("Hi", "World"))
                    .expect("Failed to create note");

                assert_eq!(note.id, 1);
                assert_eq!(note.title.as_deref(), Some("Hi"));
                assert_eq!(note.content.as_deref(), Some("World"));
                assert_eq!(note.user_id, user.id);
            }

            it "accepts a note with no fields" {
                let user = create_test_user(&db, "a@x.com");

                let note = db.create_note(user.id, NoteInput::default())
                    .expect("Failed to create note");

                assert!(note.title.is_none());
                assert!(note.content.is_none());
            }

            it "never reuses a deleted id" {
                let user = create_test_user(&db, "a@x.com");
                let first = db.create_note(user.id, NoteInput::new("T", "C")).unwrap();
                db.delete_note(user.id, first.id).unwrap();

                let second = db.create_note(user.id, NoteInput::new("T", "C")).unwrap();

                assert!(second.id > first.id);
            }

            it "rejects an unknown owner" {
                let result = db.create_note(42, NoteInput::new("T", "C"));
                assert!(result.is_err());
            }
        }

        describe "get_notes_by_user" {
            it "returns empty list for a new user" {
                let user = create_test_user(&db, "a@x.com");

                let notes = db.get_notes_by_user(user.id).expect("Query failed");
                assert!(notes.is_empty());
            }

            it "returns only the owner's notes, oldest first" {
                let alice = create_test_user(&db, "a@x.com");
                let bob = create_test_user(&db, "b@x.com");
                db.create_note(alice.id, NoteInput::new("one", "")).unwrap();
                db.create_note(bob.id, NoteInput::new("bob", "")).unwrap();
                db.create_note(alice.id, NoteInput::new("two", "")).unwrap();

                let notes = db.get_notes_by_user(alice.id).expect("Query failed");

                let titles: Vec<_> = notes.iter().filter_map(|n| n.title.as_deref()).collect();
                assert_eq!(titles, vec!["one", "two"]);
                assert!(notes.iter().all(|n| n.user_id == alice.id));
            }
        }

        describe "delete_note" {
            it "removes an owned note" {
                let user = create_test_user(&db, "a@x.com");
                let note = db.create_note(user.id, NoteInput::new("T", "C")).unwrap();

                let removed = db.delete_note(user.id, note.id).expect("Delete failed");

                assert!(removed);
                assert!(db.get_notes_by_user(user.id).unwrap().is_empty());
            }

            it "reports false the second time" {
                let user = create_test_user(&db, "a@x.com");
                let note = db.create_note(user.id, NoteInput::new("T", "C")).unwrap();
                db.delete_note(user.id, note.id).unwrap();

                let removed = db.delete_note(user.id, note.id).expect("Delete failed");
                assert!(!removed);
            }

            it "leaves another user's note alone" {
                let alice = create_test_user(&db, "a@x.com");
                let bob = create_test_user(&db, "b@x.com");
                let note = db.create_note(alice.id, NoteInput::new("T", "C")).unwrap();

                let removed = db.delete_note(bob.id, note.id).expect("Delete failed");

                assert!(!removed);
                assert_eq!(db.get_notes_by_user(alice.id).unwrap(), vec![note]);
            }
        }

        describe "update_note" {
            it "replaces both fields" {
                let user = create_test_user(&db, "a@x.com");
                let note = db.create_note(user.id, NoteInput::new("old", "old")).unwrap();

                let updated = db.update_note(user.id, note.id, NoteInput::new("new", "body"))
                    .expect("Update failed")
                    .expect("Note not found");

                assert_eq!(updated.title.as_deref(), Some("new"));
                assert_eq!(updated.content.as_deref(), Some("body"));
                assert_eq!(db.get_notes_by_user(user.id).unwrap(), vec![updated]);
            }

            it "keeps fields that are None" {
                let user = create_test_user(&db, "a@x.com");
                let note = db.create_note(user.id, NoteInput::new("title", "body")).unwrap();

                let updated = db.update_note(user.id, note.id, NoteInput {
                    title: Some("renamed".to_string()),
                    content: None,
                })
                .expect("Update failed")
                .expect("Note not found");

                assert_eq!(updated.title.as_deref(), Some("renamed"));
                assert_eq!(updated.content.as_deref(), Some("body"));
            }

            it "returns None for a missing note" {
                let user = create_test_user(&db, "a@x.com");

                let result = db.update_note(user.id, 999, NoteInput::new("T", "C"))
                    .expect("Update failed");
                assert!(result.is_none());
            }

            it "returns None for another user's note" {
                let alice = create_test_user(&db, "a@x.com");
                let bob = create_test_user(&db, "b@x.com");
                let note = db.create_note(alice.id, NoteInput::new("T", "C")).unwrap();

                let result = db.update_note(bob.id, note.id, NoteInput::new("X", "X"))
                    .expect("Update failed");

                assert!(result.is_none());
                assert_eq!(db.get_notes_by_user(alice.id).unwrap(), vec![note]);
            }
        }
    }

    describe "open" {
        it "creates the file and parent directories" {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("nested").join("lumina.db");

            let file_db = Database::open(path.clone()).expect("Failed to open");
            file_db.migrate().expect("Failed to migrate");

            assert!(path.exists());
        }

        it "keeps data across reopen" {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("lumina.db");
            {
                let file_db = Database::open(path.clone()).unwrap();
                file_db.migrate().unwrap();
                let user = create_test_user(&file_db, "a@x.com");
                file_db.create_note(user.id, NoteInput::new("kept", "")).unwrap();
            }

            let reopened = Database::open(path).unwrap();
            reopened.migrate().unwrap();

            let notes = reopened.get_notes_by_user(1).unwrap();
            assert_eq!(notes.len(), 1);
            assert_eq!(notes[0].title.as_deref(), Some("kept"));
        }
    }
}
