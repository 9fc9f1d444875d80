//! Closed category registry
//!
//! Every solution is routed to exactly one of these categories. The set is
//! compiled in and never grows at runtime; backend strings that do not name a
//! member are rejected by [`Category::from_key`].

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ============================================================================
// Category
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    SupplementsVitamins,
    Medications,
    NaturalRemedies,
    BeautySkincare,
    ExerciseMovement,
    MeditationMindfulness,
    HabitsRoutines,
    HobbiesActivities,
    DietNutrition,
    Sleep,
    TherapistsCounselors,
    DoctorsSpecialists,
    CoachesMentors,
    AlternativePractitioners,
    ProfessionalServices,
    MedicalProcedures,
    CrisisResources,
    GroupsCommunities,
    SupportGroups,
    AppsSoftware,
    ProductsDevices,
    BooksCourses,
    FinancialProducts,
}

/// Coarse grouping used to lay categories out for browsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryGroup {
    ThingsYouTake,
    Practices,
    LifestyleChanges,
    PeopleYouSee,
    Treatments,
    Communities,
    ThingsYouUse,
    Money,
}

/// Static display metadata for a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryInfo {
    pub key: &'static str,
    pub display_name: &'static str,
    pub description: &'static str,
    pub group: CategoryGroup,
}

impl Category {
    pub const ALL: [Category; 23] = [
        Category::SupplementsVitamins,
        Category::Medications,
        Category::NaturalRemedies,
        Category::BeautySkincare,
        Category::ExerciseMovement,
        Category::MeditationMindfulness,
        Category::HabitsRoutines,
        Category::HobbiesActivities,
        Category::DietNutrition,
        Category::Sleep,
        Category::TherapistsCounselors,
        Category::DoctorsSpecialists,
        Category::CoachesMentors,
        Category::AlternativePractitioners,
        Category::ProfessionalServices,
        Category::MedicalProcedures,
        Category::CrisisResources,
        Category::GroupsCommunities,
        Category::SupportGroups,
        Category::AppsSoftware,
        Category::ProductsDevices,
        Category::BooksCourses,
        Category::FinancialProducts,
    ];

    pub fn key(&self) -> &'static str {
        self.info().key
    }

    pub fn display_name(&self) -> &'static str {
        self.info().display_name
    }

    pub fn description(&self) -> &'static str {
        self.info().description
    }

    pub fn group(&self) -> CategoryGroup {
        self.info().group
    }

    /// Parse a backend category key. Unknown keys yield `None`.
    pub fn from_key(key: &str) -> Option<Category> {
        let key = key.trim();
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.key().eq_ignore_ascii_case(key))
    }

    pub fn info(&self) -> CategoryInfo {
        use CategoryGroup::*;

        let (key, display_name, description, group) = match self {
            Category::SupplementsVitamins => (
                "supplements_vitamins",
                "Supplements & Vitamins",
                "Vitamins, minerals, and dietary supplements taken by mouth",
                ThingsYouTake,
            ),
            Category::Medications => (
                "medications",
                "Medications",
                "Prescription and over-the-counter drugs",
                ThingsYouTake,
            ),
            Category::NaturalRemedies => (
                "natural_remedies",
                "Natural Remedies",
                "Herbs, teas, essential oils, and other plant-based remedies",
                ThingsYouTake,
            ),
            Category::BeautySkincare => (
                "beauty_skincare",
                "Beauty & Skincare",
                "Skincare, haircare, and cosmetic products",
                ThingsYouTake,
            ),
            Category::ExerciseMovement => (
                "exercise_movement",
                "Exercise & Movement",
                "Workouts, sports, and physical activity programs",
                Practices,
            ),
            Category::MeditationMindfulness => (
                "meditation_mindfulness",
                "Meditation & Mindfulness",
                "Meditation styles, breathwork, and mindfulness practices",
                Practices,
            ),
            Category::HabitsRoutines => (
                "habits_routines",
                "Habits & Routines",
                "Daily habits, routines, and behavioral techniques",
                Practices,
            ),
            Category::HobbiesActivities => (
                "hobbies_activities",
                "Hobbies & Activities",
                "Creative, social, and recreational pursuits",
                Practices,
            ),
            Category::DietNutrition => (
                "diet_nutrition",
                "Diet & Nutrition",
                "Eating plans, specific foods, and nutritional changes",
                LifestyleChanges,
            ),
            Category::Sleep => (
                "sleep",
                "Sleep",
                "Sleep hygiene changes, schedules, and sleep aids",
                LifestyleChanges,
            ),
            Category::TherapistsCounselors => (
                "therapists_counselors",
                "Therapists & Counselors",
                "Licensed mental health professionals and therapy services",
                PeopleYouSee,
            ),
            Category::DoctorsSpecialists => (
                "doctors_specialists",
                "Doctors & Specialists",
                "Physicians, specialists, and medical clinics",
                PeopleYouSee,
            ),
            Category::CoachesMentors => (
                "coaches_mentors",
                "Coaches & Mentors",
                "Life, career, fitness, and executive coaches",
                PeopleYouSee,
            ),
            Category::AlternativePractitioners => (
                "alternative_practitioners",
                "Alternative Practitioners",
                "Acupuncturists, chiropractors, naturopaths, and similar practitioners",
                PeopleYouSee,
            ),
            Category::ProfessionalServices => (
                "professional_services",
                "Professional Services",
                "Paid services such as cleaners, trainers, or organizers",
                PeopleYouSee,
            ),
            Category::MedicalProcedures => (
                "medical_procedures",
                "Medical Procedures",
                "Surgeries, injections, and clinical treatments",
                Treatments,
            ),
            Category::CrisisResources => (
                "crisis_resources",
                "Crisis Resources",
                "Hotlines, text lines, and emergency support services",
                Treatments,
            ),
            Category::GroupsCommunities => (
                "groups_communities",
                "Groups & Communities",
                "Clubs, classes, and online communities",
                Communities,
            ),
            Category::SupportGroups => (
                "support_groups",
                "Support Groups",
                "Peer-led and facilitated support groups",
                Communities,
            ),
            Category::AppsSoftware => (
                "apps_software",
                "Apps & Software",
                "Mobile apps, websites, and software tools",
                ThingsYouUse,
            ),
            Category::ProductsDevices => (
                "products_devices",
                "Products & Devices",
                "Physical products, gadgets, and equipment",
                ThingsYouUse,
            ),
            Category::BooksCourses => (
                "books_courses",
                "Books & Courses",
                "Books, courses, podcasts, and other learning resources",
                ThingsYouUse,
            ),
            Category::FinancialProducts => (
                "financial_products",
                "Financial Products",
                "Accounts, cards, budgeting tools, and financial services",
                Money,
            ),
        };

        CategoryInfo {
            key,
            display_name,
            description,
            group,
        }
    }
}

impl CategoryGroup {
    pub fn display_name(&self) -> &'static str {
        match self {
            CategoryGroup::ThingsYouTake => "Things you take",
            CategoryGroup::Practices => "Practices",
            CategoryGroup::LifestyleChanges => "Lifestyle changes",
            CategoryGroup::PeopleYouSee => "People you see",
            CategoryGroup::Treatments => "Treatments",
            CategoryGroup::Communities => "Communities",
            CategoryGroup::ThingsYouUse => "Things you use",
            CategoryGroup::Money => "Money",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

// ============================================================================
// Accessors
// ============================================================================

/// Display name and description for a category. No I/O.
pub fn get_category_info(category: Category) -> CategoryInfo {
    category.info()
}

/// All categories keyed by group, in declaration order within each group.
pub fn get_categories_by_group() -> BTreeMap<CategoryGroup, Vec<Category>> {
    let mut groups: BTreeMap<CategoryGroup, Vec<Category>> = BTreeMap::new();
    for category in Category::ALL {
        groups.entry(category.group()).or_default().push(category);
    }
    groups
}
