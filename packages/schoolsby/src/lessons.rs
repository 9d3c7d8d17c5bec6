use crate::{
    error::Result,
    fetch::{GradebookPage, PageFetcher},
    gradebook::Gradebook,
    model::Lesson,
    parse::parse_lessons,
};

impl<F: PageFetcher> Gradebook<F> {
    /// All lessons of the school year with their full titles.
    pub async fn get_lessons(&self) -> Result<Vec<Lesson>> {
        let html = self.fetch(GradebookPage::LastPage).await?;
        parse_lessons(&html, self.student_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::GradebookConfig,
        test_utils::{MockPortal, last_page},
    };

    #[tokio::test]
    async fn lessons_come_from_the_last_page() {
        let portal = MockPortal::new(String::new()).with_last_page(last_page(
            7,
            &[("Англ. яз.", "Английский язык"), ("Химия", "Химия")],
            &[["", "", "", ""], ["", "", "", ""]],
        ));
        let gradebook = Gradebook::with_fetcher(portal, 7, GradebookConfig::default());
        let lessons = gradebook.get_lessons().await.unwrap();
        assert_eq!(lessons.len(), 2);
        assert_eq!(lessons[0].name, "Англ. яз.");
        assert_eq!(lessons[0].full_name.as_deref(), Some("Английский язык"));
    }
}
