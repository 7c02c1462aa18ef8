//! Built-in reference catalog: six driving-test categories, five questions each.
//!
//! Used whenever no custom question bank is configured.

use crate::domain::{Category, Question};

pub fn seed_categories() -> Vec<Category> {
  vec![
    Category::new(1, "Traffic Signs", "Learn about road signs and their meanings", "traffic_light", 50),
    Category::new(2, "Road Rules", "Basic traffic rules and regulations", "rule", 45),
    Category::new(3, "Safety", "Vehicle safety and emergency procedures", "security", 40),
    Category::new(4, "Parking", "Parking rules and regulations", "local_parking", 35),
    Category::new(5, "Intersections", "Navigation through intersections", "intersection", 30),
    Category::new(6, "Highway Driving", "Highway rules and safe driving", "highway", 25),
  ]
}

/// Questions reference categories by value; `categories` must come from `seed_categories`.
pub fn seed_questions(categories: &[Category]) -> Vec<Question> {
  let signs = &categories[0];
  let rules = &categories[1];
  let safety = &categories[2];
  let parking = &categories[3];
  let intersections = &categories[4];
  let highway = &categories[5];

  vec![
    // Traffic Signs
    Question::new(1, "What does a red octagonal sign mean?",
      &["Yield", "Stop", "Caution", "No Entry"], 1, signs),
    Question::new(2, "What does a yellow diamond sign typically indicate?",
      &["Warning", "Information", "Prohibition", "Direction"], 0, signs),
    Question::new(3, "What does a circular sign with a red border mean?",
      &["Warning", "Information", "Prohibition", "Mandatory"], 2, signs),
    Question::new(4, "What does a blue rectangular sign indicate?",
      &["Warning", "Information", "Prohibition", "Mandatory"], 1, signs),
    Question::new(5, "What does a triangular sign with red border mean?",
      &["Stop", "Yield", "Warning", "No Entry"], 1, signs),

    // Road Rules
    Question::new(6, "What is the maximum speed limit in residential areas?",
      &["30 km/h", "40 km/h", "50 km/h", "60 km/h"], 2, rules),
    Question::new(7, "When should you use your turn signal?",
      &["Only when turning left", "Only when turning right", "Before any turn or lane change", "Only on highways"], 2, rules),
    Question::new(8, "What should you do at a yellow traffic light?",
      &["Speed up", "Stop if safe to do so", "Continue normally", "Honk your horn"], 1, rules),
    Question::new(9, "How far should you follow behind another vehicle?",
      &["1 second", "2 seconds", "3 seconds", "5 seconds"], 2, rules),
    Question::new(10, "When is it legal to pass another vehicle?",
      &["Anytime", "Only on highways", "When safe and legal", "Never"], 2, rules),

    // Safety
    Question::new(11, "What should you do if your brakes fail?",
      &["Pump the brakes", "Use parking brake gradually", "Turn off engine", "All of the above"], 3, safety),
    Question::new(12, "When should you check your mirrors?",
      &["Only when changing lanes", "Every 5-8 seconds", "Only when parking", "Once per trip"], 1, safety),
    Question::new(13, "What is the safest way to handle a tire blowout?",
      &["Brake hard immediately", "Grip wheel firmly and slow down gradually", "Turn sharply", "Accelerate"], 1, safety),
    Question::new(14, "What should you do in heavy rain?",
      &["Drive faster", "Use hazard lights", "Reduce speed and increase following distance", "Drive normally"], 2, safety),
    Question::new(15, "When should you use headlights?",
      &["Only at night", "30 minutes before sunset to 30 minutes after sunrise", "Only in bad weather", "Never during day"], 1, safety),

    // Parking
    Question::new(16, "How far from a fire hydrant should you park?",
      &["3 meters", "5 meters", "10 meters", "15 meters"], 1, parking),
    Question::new(17, "When parking uphill with a curb, which way should you turn your wheels?",
      &["Away from curb", "Toward curb", "Straight", "Either way"], 0, parking),
    Question::new(18, "How close to a crosswalk can you park?",
      &["Right up to it", "3 meters", "5 meters", "10 meters"], 2, parking),
    Question::new(19, "What is parallel parking?",
      &["Parking perpendicular to curb", "Parking parallel to curb", "Parking at an angle", "Parking in a garage"], 1, parking),
    Question::new(20, "When parking downhill, which way should you turn your wheels?",
      &["Away from curb", "Toward curb", "Straight", "Either way"], 1, parking),

    // Intersections
    Question::new(21, "Who has the right of way at a four-way stop?",
      &["Largest vehicle", "First to arrive", "Vehicle on the right", "Vehicle going straight"], 1, intersections),
    Question::new(22, "What should you do when approaching a flashing red light?",
      &["Slow down", "Stop completely", "Proceed with caution", "Speed up"], 1, intersections),
    Question::new(23, "When turning left at an intersection, you should yield to:",
      &["No one", "Oncoming traffic", "Pedestrians only", "Vehicles behind you"], 1, intersections),
    Question::new(24, "What does a flashing yellow light mean?",
      &["Stop", "Yield", "Proceed with caution", "Speed up"], 2, intersections),
    Question::new(25, "At a roundabout, who has the right of way?",
      &["Entering traffic", "Traffic in the roundabout", "Largest vehicle", "Emergency vehicles only"], 1, intersections),

    // Highway Driving
    Question::new(26, "What is the minimum speed on most highways?",
      &["40 km/h", "60 km/h", "80 km/h", "100 km/h"], 1, highway),
    Question::new(27, "When merging onto a highway, you should:",
      &["Stop and wait", "Match the speed of traffic", "Go as fast as possible", "Use hazard lights"], 1, highway),
    Question::new(28, "What lane should you use for normal highway driving?",
      &["Left lane", "Right lane", "Middle lane", "Any lane"], 1, highway),
    Question::new(29, "When should you use the left lane on a highway?",
      &["Normal driving", "Passing only", "Slow driving", "Emergency only"], 1, highway),
    Question::new(30, "What should you do if you miss your highway exit?",
      &["Reverse", "Stop and back up", "Continue to next exit", "Make a U-turn"], 2, highway),
  ]
}
