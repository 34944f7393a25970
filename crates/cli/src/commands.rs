//! Command implementations, kept apart from argument parsing so they can be
//! tested against a database.

use std::path::Path;

use anyhow::{bail, Context};
use hypeblog_api::auth::password::{check_password_policy, hash_password};
use hypeblog_api::importer::{self, ImportOptions, ImportReport};
use hypeblog_core::media::{is_image_name, split_file_name, THUMBNAIL_DIR};
use hypeblog_core::roles::VALID_ROLES;
use hypeblog_db::models::media::MediaInput;
use hypeblog_db::models::user::{CreateUser, User};
use hypeblog_db::repositories::{CategoryRepo, MediaRepo, UserRepo};
use hypeblog_db::DbPool;

#[derive(Debug, Default)]
pub struct ThumbnailImport {
    pub imported: u32,
    /// One human-readable line per file considered.
    pub lines: Vec<String>,
}

/// Create a media row for every image in `MEDIA_ROOT/thumbnails/` that no
/// media row references yet. The row points at the existing file.
pub async fn import_media_thumbnails(
    pool: &DbPool,
    media_root: &Path,
) -> anyhow::Result<ThumbnailImport> {
    let dir = media_root.join(THUMBNAIL_DIR);
    if !tokio::fs::try_exists(&dir).await.unwrap_or(false) {
        bail!("Thumbnail directory not found: {}", dir.display());
    }

    let mut names = Vec::new();
    let mut entries = tokio::fs::read_dir(&dir)
        .await
        .with_context(|| format!("Failed to read {}", dir.display()))?;
    while let Some(entry) = entries.next_entry().await? {
        if entry.file_type().await?.is_dir() {
            continue;
        }
        let Some(name) = entry.file_name().to_str().map(str::to_string) else {
            continue;
        };
        if is_image_name(&name) {
            names.push(name);
        }
    }
    names.sort();

    let mut report = ThumbnailImport::default();
    for name in names {
        let stored = format!("{THUMBNAIL_DIR}/{name}");
        if MediaRepo::is_referenced(pool, &stored).await? {
            report.lines.push(format!("Skipping existing: {name}"));
            continue;
        }

        let input = MediaInput {
            title: split_file_name(&name).0.to_string(),
            file: None,
            thumbnail: Some(stored),
        };
        match MediaRepo::create(pool, &input).await {
            Ok(media) => {
                tracing::debug!(media_id = media.id, file = %name, "Imported thumbnail");
                report.imported += 1;
                report.lines.push(format!("Imported: {name}"));
            }
            Err(e) => report.lines.push(format!("Error importing {name}: {e}")),
        }
    }

    Ok(report)
}

/// Run the WordPress importer with CLI-style arguments: the default
/// category is a slug and the author a username.
pub async fn import_wordpress(
    pool: &DbPool,
    xml: &str,
    default_category: Option<&str>,
    skip_existing: bool,
    author: &str,
) -> anyhow::Result<ImportReport> {
    let author = UserRepo::find_by_username(pool, author)
        .await?
        .with_context(|| format!("No user named '{author}'"))?;

    let default_category_id = match default_category {
        Some(slug) => Some(
            CategoryRepo::find_by_slug(pool, slug)
                .await?
                .with_context(|| format!("No category with slug '{slug}'"))?
                .id,
        ),
        None => None,
    };

    let options = ImportOptions {
        default_category_id,
        skip_existing,
        author_id: author.id,
    };
    Ok(importer::import_wordpress(pool, xml, &options).await?)
}

pub async fn create_user(
    pool: &DbPool,
    username: &str,
    email: &str,
    role: &str,
    password: &str,
) -> anyhow::Result<User> {
    if !VALID_ROLES.contains(&role) {
        bail!("Unknown role '{role}', expected one of {}", VALID_ROLES.join(", "));
    }
    check_password_policy(password)?;
    let password_hash = hash_password(password)?;

    let user = UserRepo::create(
        pool,
        &CreateUser {
            username: username.trim().to_string(),
            email: email.trim().to_string(),
            password_hash,
            role: role.to_string(),
        },
    )
    .await
    .with_context(|| format!("Failed to create user '{username}'"))?;

    tracing::info!(user_id = user.id, role = %user.role, "User created");
    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::PgPool;

    #[sqlx::test(migrations = "../../db/migrations")]
    async fn thumbnails_are_imported_once(pool: PgPool) {
        let root = tempfile::tempdir().unwrap();
        let thumbs = root.path().join(THUMBNAIL_DIR);
        std::fs::create_dir_all(thumbs.join("nested")).unwrap();
        std::fs::write(thumbs.join("poster.png"), b"png").unwrap();
        std::fs::write(thumbs.join("Cover.JPG"), b"jpg").unwrap();
        std::fs::write(thumbs.join("notes.txt"), b"text").unwrap();

        let first = import_media_thumbnails(&pool, root.path()).await.unwrap();
        assert_eq!(first.imported, 2);
        assert_eq!(first.lines, vec!["Imported: Cover.JPG", "Imported: poster.png"]);

        assert!(MediaRepo::is_referenced(&pool, "thumbnails/poster.png").await.unwrap());

        let second = import_media_thumbnails(&pool, root.path()).await.unwrap();
        assert_eq!(second.imported, 0);
        assert_eq!(second.lines.len(), 2);
        assert!(second.lines.iter().all(|l| l.starts_with("Skipping existing")));
    }

    #[sqlx::test(migrations = "../../db/migrations")]
    async fn missing_thumbnail_directory_is_an_error(pool: PgPool) {
        let root = tempfile::tempdir().unwrap();
        let err = import_media_thumbnails(&pool, root.path()).await.unwrap_err();
        assert!(err.to_string().contains("Thumbnail directory not found"));
    }

    #[sqlx::test(migrations = "../../db/migrations")]
    async fn create_user_hashes_password(pool: PgPool) {
        let user = create_user(&pool, " alice ", "alice@example.com", "editor", "long-enough-pw")
            .await
            .unwrap();
        assert_eq!(user.username, "alice");
        assert_eq!(user.role, "editor");
        assert!(user.password_hash.starts_with("$argon2id$"));
    }

    #[sqlx::test(migrations = "../../db/migrations")]
    async fn create_user_rejects_bad_input(pool: PgPool) {
        let err = create_user(&pool, "bob", "bob@example.com", "viewer", "long-enough-pw")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Unknown role"));

        let err = create_user(&pool, "bob", "bob@example.com", "admin", "short")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("at least"));
    }

    #[sqlx::test(migrations = "../../db/migrations")]
    async fn import_requires_known_author_and_category(pool: PgPool) {
        let err = import_wordpress(&pool, "<rss/>", None, false, "nobody")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("No user named"));

        create_user(&pool, "admin", "admin@example.com", "admin", "long-enough-pw")
            .await
            .unwrap();
        let err = import_wordpress(&pool, "<rss/>", Some("missing"), false, "admin")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("No category"));
    }
}
