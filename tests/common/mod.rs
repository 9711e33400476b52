#![allow(dead_code)]

use chrono::DateTime;
use git2::{Oid, Repository, Signature, Time};
use std::path::Path;
use tempfile::TempDir;

/// 一時ディレクトリ上のテスト用リポジトリ
pub struct TestRepo {
    pub dir: TempDir,
    pub repo: Repository,
}

impl TestRepo {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        Self { dir, repo }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// `files`をそのままツリーとするコミットを作成します
    ///
    /// `update_head`がfalseの場合、HEADは動かしません（マージ元のブランチ用）。
    pub fn commit(
        &self,
        update_head: bool,
        files: &[(&str, &str)],
        parents: &[Oid],
        email: &str,
        when: &str,
    ) -> Oid {
        let mut builder = self.repo.treebuilder(None).unwrap();
        for (name, content) in files {
            let blob = self.repo.blob(content.as_bytes()).unwrap();
            builder.insert(*name, blob, 0o100644).unwrap();
        }
        let tree = self.repo.find_tree(builder.write().unwrap()).unwrap();

        let at = DateTime::parse_from_rfc3339(when).unwrap();
        let time = Time::new(at.timestamp(), at.offset().local_minus_utc() / 60);
        let sig = Signature::new("Tester", email, &time).unwrap();

        let parents: Vec<_> = parents
            .iter()
            .map(|id| self.repo.find_commit(*id).unwrap())
            .collect();
        let parent_refs: Vec<_> = parents.iter().collect();
        let update_ref = if update_head { Some("HEAD") } else { None };

        self.repo
            .commit(update_ref, &sig, &sig, "test commit", &tree, &parent_refs)
            .unwrap()
    }

    pub fn write_worktree_file(&self, name: &str, content: &str) {
        std::fs::write(self.path().join(name), content).unwrap();
    }
}

/// 二つの期間・二人の貢献者を持つ典型的な履歴
///
/// - `c0`: ルートコミット（期間外）
/// - `c1`: Aliceが`notes.md`に空でない3行を追加（期間0）
/// - `fake`: Aliceのコミットだが除外指定（期間0）
/// - `side`: 別アドレスで`fig.png`を追加、Bobに手動で帰属（期間0）
/// - `merge`: Aliceによるマージコミット（期間1）
pub struct Scenario {
    pub repo: TestRepo,
    pub c1: Oid,
    pub fake: Oid,
    pub side: Oid,
    pub merge: Oid,
}

impl Scenario {
    pub fn build() -> Self {
        let repo = TestRepo::new();
        let readme = ("README", "intro\n");
        let notes = ("notes.md", "alpha beta\ngamma\n\n  \ndelta epsilon zeta\n");
        let junk = ("junk.md", "auto generated output\n");
        let fig = ("fig.png", "not really a png");

        let c0 = repo.commit(true, &[readme], &[], "a@x.com", "2021-02-20T10:00:00+09:00");
        let c1 = repo.commit(true, &[readme, notes], &[c0], "a@x.com", "2021-03-03T10:00:00+09:00");
        let fake = repo.commit(
            true,
            &[readme, notes, junk],
            &[c1],
            "a@x.com",
            "2021-03-04T10:00:00+09:00",
        );
        let side = repo.commit(false, &[readme, fig], &[c0], "someone@else.org", "2021-03-05T10:00:00+09:00");
        let merge = repo.commit(
            true,
            &[readme, notes, junk, fig],
            &[fake, side],
            "a@x.com",
            "2021-03-15T10:00:00+09:00",
        );

        repo.write_worktree_file("diary.md", "# 2021-03-15 weekly\n- merged work\n# no date here\n");

        Self {
            repo,
            c1,
            fake,
            side,
            merge,
        }
    }

    pub fn config_toml(&self) -> String {
        format!(
            r##"
fake_commits = ["{fake}"]

[[windows]]
since = "2021-03-01T00:00:00+09:00"
until = "2021-03-10T00:00:00+09:00"

[[windows]]
since = "2021-03-10T00:00:00+09:00"
until = "2021-03-20T00:00:00+09:00"

[[contributors]]
name = "Alice"
emails = ["a@x.com"]
labels = ["team-a"]
diary = ["diary.md"]

[[contributors]]
name = "Bob"
emails = ["bob@x.com"]
commits = ["{side}"]
"##,
            fake = self.fake,
            side = self.side,
        )
    }
}
