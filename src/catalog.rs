//! Course catalog
//!
//! Owns course listings. The ledger updates the student and rating
//! counters as side effects of purchases and ratings.

use odra::prelude::*;
use odra::casper_types::U256;

use crate::errors::Error;
use crate::types::Course;

/// Course listings and per-instructor indexes
#[odra::module]
pub struct CourseCatalog {
    /// Mapping of course ID to Course data
    courses: Mapping<u64, Course>,
    /// Total number of courses (used for generating IDs)
    course_count: Var<u64>,
    /// Count of courses per instructor
    instructor_course_count: Mapping<Address, u64>,
    /// Indexed courses: (instructor, index) -> course_id
    instructor_course_at: Mapping<(Address, u64), u64>,
}

#[odra::module]
impl CourseCatalog {
    /// List a new course under `instructor`
    pub fn create(
        &mut self,
        instructor: Address,
        title: String,
        description: String,
        cover_ref: String,
        price: U256,
        category_id: u64,
    ) -> Course {
        self.validate_listing(&title, price);

        let course_id = self.course_count.get_or_default() + 1;
        self.course_count.set(course_id);

        let course = Course {
            id: course_id,
            title,
            description,
            cover_ref,
            price,
            instructor,
            active: true,
            created_at: self.env().get_block_time(),
            total_students: 0,
            category_id,
            total_rating_sum: 0,
            rating_count: 0,
        };
        self.courses.set(&course_id, course.clone());

        let index = self.instructor_course_count.get_or_default(&instructor);
        self.instructor_course_at.set(&(instructor, index), course_id);
        self.instructor_course_count.set(&instructor, index + 1);

        course
    }

    /// Overwrite the mutable fields of a course; counters are kept
    pub fn update(
        &mut self,
        caller: Address,
        course_id: u64,
        title: String,
        description: String,
        cover_ref: String,
        price: U256,
        category_id: u64,
    ) -> Course {
        let mut course = self.course_or_revert(course_id);
        if course.instructor != caller {
            self.env().revert(Error::NotInstructor);
        }
        self.validate_listing(&title, price);

        course.title = title;
        course.description = description;
        course.cover_ref = cover_ref;
        course.price = price;
        course.category_id = category_id;
        self.courses.set(&course_id, course.clone());
        course
    }

    /// Hide a course from new purchases
    pub fn deactivate(&mut self, course_id: u64) -> Course {
        let mut course = self.course_or_revert(course_id);
        course.active = false;
        self.courses.set(&course_id, course.clone());
        course
    }

    /// Count one more student
    pub fn record_student(&mut self, course_id: u64) {
        let mut course = self.course_or_revert(course_id);
        course.total_students += 1;
        self.courses.set(&course_id, course);
    }

    /// Fold one rating into the aggregate
    pub fn record_rating(&mut self, course_id: u64, score: u8) -> Course {
        let mut course = self.course_or_revert(course_id);
        course.total_rating_sum += score as u64;
        course.rating_count += 1;
        self.courses.set(&course_id, course.clone());
        course
    }

    /// Get a course or revert with `CourseNotFound`
    pub fn course_or_revert(&self, course_id: u64) -> Course {
        self.courses.get(&course_id)
            .unwrap_or_else(|| self.env().revert(Error::CourseNotFound))
    }

    /// Get a course by ID
    pub fn get_course(&self, course_id: u64) -> Option<Course> {
        self.courses.get(&course_id)
    }

    /// Number of courses ever created
    pub fn get_course_count(&self) -> u64 {
        self.course_count.get_or_default()
    }

    /// Active courses, skipping `offset` of them and returning at most `limit`
    pub fn get_active_courses(&self, offset: u64, limit: u64) -> Vec<Course> {
        let count = self.course_count.get_or_default();
        let mut skipped = 0;
        let mut result = Vec::new();

        for id in 1..=count {
            if result.len() as u64 >= limit {
                break;
            }
            if let Some(course) = self.courses.get(&id) {
                if !course.active {
                    continue;
                }
                if skipped < offset {
                    skipped += 1;
                    continue;
                }
                result.push(course);
            }
        }

        result
    }

    /// Active courses filed under `category_id`
    pub fn get_courses_by_category(&self, category_id: u64) -> Vec<Course> {
        let count = self.course_count.get_or_default();
        let mut result = Vec::new();

        for id in 1..=count {
            if let Some(course) = self.courses.get(&id) {
                if course.active && course.category_id == category_id {
                    result.push(course);
                }
            }
        }

        result
    }

    /// IDs of courses created by `instructor`
    pub fn get_instructor_courses(&self, instructor: Address) -> Vec<u64> {
        let count = self.instructor_course_count.get_or_default(&instructor);
        let mut result = Vec::new();

        for i in 0..count {
            if let Some(course_id) = self.instructor_course_at.get(&(instructor, i)) {
                result.push(course_id);
            }
        }

        result
    }
}

impl CourseCatalog {
    fn validate_listing(&self, title: &str, price: U256) {
        if title.is_empty() {
            self.env().revert(Error::EmptyTitle);
        }
        if price.is_zero() {
            self.env().revert(Error::InvalidPrice);
        }
    }
}
